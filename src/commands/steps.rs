use std::collections::{HashMap, HashSet};

use crate::commands::session::{attach, SessionPaths};
use crate::core::{
    error::{Result, TutorialError},
    output::format_step_marker,
    print_section_header,
    progress::StepStatus,
    step_tree::{find_step, roots, StepNode},
};
use colored::*;

pub fn execute_steps(paths: &SessionPaths) -> Result<()> {
    let manager = attach(paths)?;
    let tutorial = manager
        .get_current_tutorial()
        .ok_or(TutorialError::TutorialNotLoaded)?;
    let statuses: HashMap<String, StepStatus> = manager.step_statuses()?.into_iter().collect();

    print_section_header(&format!("{} v{}", tutorial.name, tutorial.version));
    for line in render_step_lines(&tutorial.steps, &statuses) {
        println!("{line}");
    }
    println!();
    Ok(())
}

/// Depth-first listing from the roots, children indented under their parent.
///
/// Steps unreachable from any root (a parent cycle) are appended at the top level so
/// nothing is hidden.
pub fn render_step_lines(steps: &[StepNode], statuses: &HashMap<String, StepStatus>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut visited = HashSet::new();

    for root in roots(steps) {
        render_subtree(steps, root, 0, statuses, &mut visited, &mut lines);
    }
    for step in steps {
        if !visited.contains(step.id.as_str()) {
            render_subtree(steps, step, 0, statuses, &mut visited, &mut lines);
        }
    }
    lines
}

fn render_subtree<'a>(
    steps: &'a [StepNode],
    step: &'a StepNode,
    depth: usize,
    statuses: &HashMap<String, StepStatus>,
    visited: &mut HashSet<&'a str>,
    lines: &mut Vec<String>,
) {
    if !visited.insert(step.id.as_str()) {
        return;
    }

    let status = statuses
        .get(&step.id)
        .copied()
        .unwrap_or(StepStatus::Pending);
    lines.push(format!(
        "{}{} {} {}",
        "  ".repeat(depth + 1),
        format_step_marker(status),
        step.id.white(),
        step.title.bright_black()
    ));

    for child_id in &step.children {
        if let Some(child) = find_step(steps, child_id) {
            render_subtree(steps, child, depth + 1, statuses, visited, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, children: &[&str]) -> StepNode {
        StepNode {
            id: id.to_string(),
            title: format!("Title {id}"),
            description: None,
            git_ref: "HEAD".to_string(),
            parent_id: parent.map(str::to_string),
            explanation: format!("{id}.md"),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_children_are_indented_under_parent() {
        colored::control::set_override(false);
        let steps = vec![
            node("a", None, &["b"]),
            node("b", Some("a"), &[]),
            node("c", None, &[]),
        ];
        let statuses = HashMap::from([
            ("a".to_string(), StepStatus::Completed),
            ("b".to_string(), StepStatus::Current),
        ]);

        let lines = render_step_lines(&steps, &statuses);
        assert_eq!(
            lines,
            vec![
                "  [✓] a Title a",
                "    [*] b Title b",
                "  [ ] c Title c",
            ]
        );
        colored::control::unset_override();
    }

    #[test]
    fn test_cycle_members_still_listed_once() {
        let steps = vec![node("x", Some("y"), &["y"]), node("y", Some("x"), &["x"])];
        let lines = render_step_lines(&steps, &HashMap::new());
        assert_eq!(lines.len(), 2);
    }
}
