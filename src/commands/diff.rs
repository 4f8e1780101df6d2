use crate::commands::session::{attach, resolve_step_id, SessionPaths};
use crate::core::{
    diff_parser::FileDiff,
    error::Result,
    output::{format_diff_line, format_file_status},
    print_info, print_section_header,
};
use colored::*;

/// Show what a step changed relative to its parent, or relative to `from` when given.
pub fn execute_diff(
    paths: &SessionPaths,
    step_id: Option<String>,
    from: Option<String>,
    stat_only: bool,
) -> Result<()> {
    let manager = attach(paths)?;
    let step_id = resolve_step_id(&manager, step_id)?;

    let diffs = match from.as_deref() {
        Some(from) => manager.diff_between(Some(from), &step_id)?,
        None => manager.step_diff(&step_id)?,
    };

    if diffs.is_empty() {
        print_info(&format!("Step '{step_id}' introduces no file changes"));
        return Ok(());
    }

    print_section_header(&format!("Changes in step '{step_id}'"));
    for line in summary_lines(&diffs) {
        println!("{line}");
    }

    if !stat_only {
        for diff in &diffs {
            println!();
            print!("{}", "═══ ".bright_blue().bold());
            print!("{}", diff.file_path.bright_blue().bold());
            println!("{}", " ═══".bright_blue().bold());
            if diff.hunks.is_empty() {
                println!("{}", "(no textual changes)".bright_black());
            }
            for hunk in &diff.hunks {
                let header = format!(
                    "@@ -{},{} +{},{} @@",
                    hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines
                );
                println!("{}", format_diff_line(&header));
                for line in hunk.content.lines() {
                    println!("{}", format_diff_line(line));
                }
            }
        }
    }
    println!();
    Ok(())
}

/// One line per file: status letter, path (with the old path for renames) and counts.
pub fn summary_lines(diffs: &[FileDiff]) -> Vec<String> {
    diffs
        .iter()
        .map(|diff| {
            let path = match &diff.old_path {
                Some(old) => format!("{old} → {}", diff.file_path),
                None => diff.file_path.clone(),
            };
            format!(
                "  {}  {} {} {}",
                format_file_status(diff.status),
                path,
                format!("+{}", diff.additions).green(),
                format!("-{}", diff.deletions).red()
            )
        })
        .collect()
}
