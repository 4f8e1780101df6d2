use std::path::Path;

use crate::core::{
    error::Result, print_section_header, print_success, step_tree::build_step_tree,
    tutorial_config::parse_file,
};
use colored::*;

/// Check a config document without loading it. Every problem is reported at once through
/// the returned error.
pub fn execute_validate(file: &Path) -> Result<()> {
    let config = parse_file(file)?;
    let steps = build_step_tree(&config.steps);

    print_success(&format!(
        "'{}' is a valid tutorial with {} step(s)",
        config.name,
        steps.len()
    ));
    print_section_header("Steps");
    for step in &steps {
        let parent = step
            .parent_id
            .as_deref()
            .map(|id| format!(" after {id}"))
            .unwrap_or_default();
        println!(
            "  {} {} {}{}",
            step.id.white(),
            step.git_ref.blue(),
            step.title,
            parent.bright_black()
        );
    }
    println!();
    Ok(())
}
