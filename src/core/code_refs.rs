//! `code-ref` markers inside step narratives.
//!
//! A narrative may point at source lines with an HTML comment:
//! `<!-- code-ref: src/main.rs:10-20 -->` or `<!-- code-ref: src/main.rs:7 -->`.
//! Everything else in the Markdown is left to the renderer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::core::error::{FileOperation, Result, TutorialError};
use crate::core::step_tree::StepNode;

static CODE_REF: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"<!--\s*code-ref:\s*(\S+?):(\d+)(?:-(\d+))?\s*-->"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRef {
    pub file_path: String,
    pub start_line: u32,
    /// Same as `start_line` when the marker names a single line
    pub end_line: u32,
}

/// Narrative text of a step with its markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepExplanation {
    pub content: String,
    pub code_refs: Vec<CodeRef>,
}

/// Markers in document order. Malformed markers are ignored.
pub fn parse_code_refs(markdown: &str) -> Vec<CodeRef> {
    let re = match CODE_REF.as_ref() {
        Ok(re) => re,
        Err(e) => {
            log::warn!("code-ref pattern failed to compile: {e}");
            return Vec::new();
        }
    };

    re.captures_iter(markdown)
        .filter_map(|cap| {
            let file_path = cap.get(1)?.as_str().to_string();
            let start_line: u32 = cap.get(2)?.as_str().parse().ok()?;
            let end_line = match cap.get(3) {
                Some(end) => end.as_str().parse().ok()?,
                None => start_line,
            };
            Some(CodeRef {
                file_path,
                start_line,
                end_line,
            })
        })
        .collect()
}

/// Read the narrative of `step` relative to the tutorial `root`.
pub fn load_explanation(root: &Path, step: &StepNode) -> Result<StepExplanation> {
    let path = root.join(&step.explanation);
    let content = fs::read_to_string(&path)
        .map_err(|e| TutorialError::file_operation(FileOperation::Read, &path, e))?;
    let code_refs = parse_code_refs(&content);
    log::debug!(
        "Loaded explanation for '{}' with {} code reference(s)",
        step.id,
        code_refs.len()
    );
    Ok(StepExplanation { content, code_refs })
}
