use crate::commands::session::{attach, resolve_step_id, SessionPaths};
use crate::core::{error::Result, print_section_header};
use colored::*;

/// Print a step's narrative followed by the code it points at.
pub fn execute_explain(paths: &SessionPaths, step_id: Option<String>) -> Result<()> {
    let manager = attach(paths)?;
    let step_id = resolve_step_id(&manager, step_id)?;
    let explanation = manager.explanation(&step_id)?;

    print_section_header(&format!("Step '{step_id}'"));
    println!("{}", explanation.content.trim_end());

    if !explanation.code_refs.is_empty() {
        print_section_header("Code references");
        for code_ref in &explanation.code_refs {
            let lines = if code_ref.start_line == code_ref.end_line {
                code_ref.start_line.to_string()
            } else {
                format!("{}-{}", code_ref.start_line, code_ref.end_line)
            };
            println!("  {}:{}", code_ref.file_path.blue(), lines.bright_black());
        }
    }
    println!();
    Ok(())
}
