use crate::commands::session::{open_manager, save_session, Session, SessionPaths};
use crate::core::{error::Result, print_info, print_success};

/// Load a tutorial from a local path or remote URL and remember it as the session.
pub fn execute_load(paths: &SessionPaths, source: &str) -> Result<()> {
    let mut manager = open_manager(paths)?;
    let tutorial = manager.load_tutorial(source)?;

    let session = Session::for_tutorial(tutorial, source);
    let summary = format!(
        "Loaded '{}' v{} ({} steps) from {}",
        tutorial.name,
        tutorial.version,
        tutorial.steps.len(),
        tutorial.root_path.display()
    );
    save_session(&mut manager, &session)?;

    print_success(&summary);
    match manager.restore_current_step()? {
        Some(step) => print_info(&format!(
            "Resuming at step '{}'. Run 'git-tutorial goto {}' to check it out again",
            step.id, step.id
        )),
        None => print_info("Run 'git-tutorial next' to start at the first step"),
    }
    Ok(())
}
