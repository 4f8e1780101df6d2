use crate::commands::session::{attach, SessionPaths};
use crate::core::{
    error::{Result, TutorialError},
    print_info, print_success,
    progress::StepStatus,
};
use colored::*;

pub fn execute_progress(paths: &SessionPaths) -> Result<()> {
    let manager = attach(paths)?;
    let tutorial = manager
        .get_current_tutorial()
        .ok_or(TutorialError::TutorialNotLoaded)?;
    let statuses = manager.step_statuses()?;
    let completed = statuses
        .iter()
        .filter(|(_, status)| *status == StepStatus::Completed)
        .count();

    println!(
        "\n{} {}/{} steps completed",
        tutorial.name.white(),
        completed.to_string().green(),
        statuses.len()
    );
    match manager.get_current_step() {
        Some(step) => println!("  Current step: {} {}", step.id.white(), step.title.bright_black()),
        None => println!("  {}", "No step visited yet".bright_black()),
    }
    if let Some(record) = manager.progress().progress(&tutorial.id) {
        let last = record.last_access_time.with_timezone(&chrono::Local);
        println!(
            "  Last visited: {}",
            last.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
    println!();
    Ok(())
}

pub fn execute_reset(paths: &SessionPaths) -> Result<()> {
    let mut manager = attach(paths)?;
    manager.reset_progress()?;
    print_success("Progress reset");
    print_info("The working tree was left as it is");
    Ok(())
}
