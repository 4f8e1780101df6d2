//! Step graph built from validated step configs.
//!
//! Parent links come straight from the config; child links are derived by inverting them.
//! The builder trusts the validator: a `parentId` that names no step is skipped without
//! error, so the child simply contributes to no parent's `children`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::tutorial_config::StepConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNode {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub git_ref: String,
    pub parent_id: Option<String>,
    pub explanation: String,
    /// Child step ids in declaration order
    pub children: Vec<String>,
}

impl From<&StepConfig> for StepNode {
    fn from(config: &StepConfig) -> Self {
        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            description: config.description.clone(),
            git_ref: config.git_ref.clone(),
            parent_id: config.parent_id.clone(),
            explanation: config.explanation.clone(),
            children: Vec::new(),
        }
    }
}

impl From<&StepNode> for StepConfig {
    fn from(node: &StepNode) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            git_ref: node.git_ref.clone(),
            parent_id: node.parent_id.clone(),
            explanation: node.explanation.clone(),
        }
    }
}

/// Build nodes for `configs`, preserving input order.
pub fn build_step_tree(configs: &[StepConfig]) -> Vec<StepNode> {
    let mut nodes: Vec<StepNode> = configs.iter().map(StepNode::from).collect();

    let index_by_id: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.clone(), index))
        .collect();

    for child_index in 0..nodes.len() {
        let Some(parent_id) = nodes[child_index].parent_id.clone() else {
            continue;
        };
        match index_by_id.get(&parent_id) {
            Some(&parent_index) => {
                let child_id = nodes[child_index].id.clone();
                nodes[parent_index].children.push(child_id);
            }
            None => log::debug!(
                "Step '{}' names unknown parent '{parent_id}', leaving it unlinked",
                nodes[child_index].id
            ),
        }
    }

    nodes
}

pub fn find_step<'a>(steps: &'a [StepNode], step_id: &str) -> Option<&'a StepNode> {
    steps.iter().find(|step| step.id == step_id)
}

/// Steps without a parent, in input order.
pub fn roots(steps: &[StepNode]) -> Vec<&StepNode> {
    steps.iter().filter(|step| step.parent_id.is_none()).collect()
}

pub fn children_of<'a>(steps: &'a [StepNode], step_id: &str) -> Vec<&'a StepNode> {
    find_step(steps, step_id)
        .map(|step| {
            step.children
                .iter()
                .filter_map(|child| find_step(steps, child))
                .collect()
        })
        .unwrap_or_default()
}

/// The step followed by its ancestors, nearest first.
///
/// Stops at an unresolvable parent or on a cycle.
pub fn path_to_root<'a>(steps: &'a [StepNode], step_id: &str) -> Vec<&'a StepNode> {
    let mut path: Vec<&StepNode> = Vec::new();
    let mut cursor = find_step(steps, step_id);
    while let Some(step) = cursor {
        if path.iter().any(|seen| seen.id == step.id) {
            break;
        }
        path.push(step);
        cursor = step
            .parent_id
            .as_deref()
            .and_then(|parent| find_step(steps, parent));
    }
    path
}
