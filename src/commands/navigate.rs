use crate::commands::session::{attach, CliManager, SessionPaths};
use crate::core::{
    error::Result,
    manager::{DirtyResolution, NavigationOutcome},
    print_info, print_success,
};
use colored::*;

/// Resolution from `--stash`/`--discard`, if either was given.
pub fn resolution_from_flags(stash: bool, discard: bool) -> Option<DirtyResolution> {
    match (stash, discard) {
        (true, _) => Some(DirtyResolution::Stash),
        (false, true) => Some(DirtyResolution::Discard),
        (false, false) => None,
    }
}

pub fn execute_goto(
    paths: &SessionPaths,
    step_id: &str,
    resolution: Option<DirtyResolution>,
) -> Result<()> {
    let mut manager = attach(paths)?;
    navigate(&mut manager, step_id, resolution)
}

/// Move to the first child of the current step, or to the first root.
pub fn execute_next(paths: &SessionPaths, resolution: Option<DirtyResolution>) -> Result<()> {
    let mut manager = attach(paths)?;
    let next = manager.next_step()?.map(|step| step.id.clone());

    match next {
        Some(step_id) => navigate(&mut manager, &step_id, resolution),
        None => {
            match manager.get_current_step() {
                Some(step) => print_info(&format!(
                    "'{}' is the last step on this path. Run 'git-tutorial steps' for other branches",
                    step.id
                )),
                None => print_info("This tutorial has no steps"),
            }
            Ok(())
        }
    }
}

fn navigate(
    manager: &mut CliManager,
    step_id: &str,
    resolution: Option<DirtyResolution>,
) -> Result<()> {
    let choice = resolution.unwrap_or(manager.settings().on_dirty);

    match manager.navigate_to_step(step_id, || choice)? {
        NavigationOutcome::Navigated {
            step,
            stashed,
            discarded,
        } => {
            if stashed {
                print_info("Stashed your changes. Run 'git-tutorial unstash' to bring them back");
            }
            if discarded {
                print_info("Discarded uncommitted changes");
            }
            print_success(&format!("Now at step '{}': {}", step.id, step.title));
            if let Some(description) = &step.description {
                println!("  {}", description.bright_black());
            }
            println!();
        }
        NavigationOutcome::Cancelled => {
            print_info(&format!(
                "Stayed put: the working tree has uncommitted changes.\n\
                 Run 'git-tutorial goto {step_id} --stash' to keep them aside \
                 or '--discard' to throw them away"
            ));
        }
    }
    Ok(())
}

pub fn execute_unstash(paths: &SessionPaths) -> Result<()> {
    let manager = attach(paths)?;
    manager.stash_pop()?;
    print_success("Restored stashed changes");
    Ok(())
}
