//! Output formatting for the git-tutorial command line.
//!
//! Every command prints through these helpers so colors and spacing stay uniform:
//! red for errors, blue for usage and headers, bright_black for secondary detail.

use colored::*;

use crate::core::file_status::FileStatus;
use crate::core::progress::StepStatus;

/// Formats and prints an error message
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// `[✓]`, `[*]` or `[ ]` for a step's progress state.
pub fn format_step_marker(status: StepStatus) -> String {
    let mark = match status {
        StepStatus::Completed => "✓".green(),
        StepStatus::Current => "*".yellow(),
        StepStatus::Pending => " ".normal(),
    };
    format!("{}{}{}", "[".bright_black(), mark, "]".bright_black())
}

/// One-letter file status colored the way `git status` users expect.
pub fn format_file_status(status: FileStatus) -> ColoredString {
    match status {
        FileStatus::Added => status.as_str().green(),
        FileStatus::Modified => status.as_str().yellow(),
        FileStatus::Deleted => status.as_str().red(),
        FileStatus::Renamed => status.as_str().blue(),
    }
}

/// Color one line of hunk text by its leading marker.
pub fn format_diff_line(line: &str) -> ColoredString {
    if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else {
        line.normal()
    }
}
