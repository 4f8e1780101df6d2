//! Structured file diffs from `git diff` text output.
//!
//! Two inputs are combined: the per-file counts printed by `git diff --numstat` and the
//! unified diff body printed by `git diff`. The body is scanned line by line, tracking the
//! current file (post-change path of the `diff --git` header) and the current hunk
//! (`@@ -a,b +c,d @@`). Hunk lines are accumulated until the next hunk or file header.
//!
//! # Public API
//! - [`parse_numstat`]: per-file insertion/deletion counts
//! - [`parse_patches`]: hunks per post-change path
//! - [`synthesize`]: final [`FileDiff`] list with status classification

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::file_status::FileStatus;

/// One `@@` block: 1-based positions and span lengths plus its raw lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// Context and change lines, newline-joined, prefixes kept
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub file_path: String,
    /// Pre-change path, only for renames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub additions: u32,
    pub deletions: u32,
    pub hunks: Vec<DiffHunk>,
}

/// A `--numstat` line. Binary files report zero counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeSummary {
    /// Path as printed, possibly in `old => new` rename form
    pub path: String,
    pub insertions: u32,
    pub deletions: u32,
    pub binary: bool,
}

/// Everything the unified diff says about one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub hunks: Vec<DiffHunk>,
    pub new_file: bool,
    pub deleted_file: bool,
}

const RENAME_ARROW: &str = " => ";

pub fn parse_numstat(text: &str) -> Vec<FileChangeSummary> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let insertions = fields.next()?;
            let deletions = fields.next()?;
            let path = fields.next()?;
            let binary = insertions == "-" && deletions == "-";
            Some(FileChangeSummary {
                path: path.to_string(),
                insertions: insertions.parse().unwrap_or(0),
                deletions: deletions.parse().unwrap_or(0),
                binary,
            })
        })
        .collect()
}

struct HunkBuilder {
    old_start: u32,
    old_lines: u32,
    new_start: u32,
    new_lines: u32,
    lines: Vec<String>,
}

impl HunkBuilder {
    fn finish(self) -> DiffHunk {
        DiffHunk {
            old_start: self.old_start,
            old_lines: self.old_lines,
            new_start: self.new_start,
            new_lines: self.new_lines,
            content: self.lines.join("\n"),
        }
    }
}

/// Hunks keyed by post-change path, in diff order within each file.
pub fn parse_patches(diff_text: &str) -> HashMap<String, FilePatch> {
    let mut patches: HashMap<String, FilePatch> = HashMap::new();
    let mut current_file: Option<String> = None;
    let mut current_hunk: Option<HunkBuilder> = None;

    let flush = |patches: &mut HashMap<String, FilePatch>,
                 file: &Option<String>,
                 hunk: &mut Option<HunkBuilder>| {
        if let (Some(file), Some(builder)) = (file, hunk.take()) {
            patches
                .entry(file.clone())
                .or_default()
                .hunks
                .push(builder.finish());
        }
    };

    for line in diff_text.lines() {
        if let Some(header) = line.strip_prefix("diff --git ") {
            flush(&mut patches, &current_file, &mut current_hunk);
            current_file = parse_file_header(header);
            if let Some(file) = &current_file {
                patches.entry(file.clone()).or_default();
            }
            continue;
        }

        if line.starts_with("@@") {
            flush(&mut patches, &current_file, &mut current_hunk);
            current_hunk = parse_hunk_header(line).map(|(old_start, old_lines, new_start, new_lines)| {
                HunkBuilder {
                    old_start,
                    old_lines,
                    new_start,
                    new_lines,
                    lines: Vec::new(),
                }
            });
            if current_hunk.is_none() {
                log::debug!("Skipping malformed hunk header: {line}");
            }
            continue;
        }

        if let Some(builder) = current_hunk.as_mut() {
            if line.starts_with('+') || line.starts_with('-') || line.starts_with(' ') {
                builder.lines.push(line.to_string());
            }
            continue;
        }

        // Extended header lines between `diff --git` and the first hunk
        if let Some(file) = &current_file {
            if line.starts_with("new file mode") {
                patches.entry(file.clone()).or_default().new_file = true;
            } else if line.starts_with("deleted file mode") {
                patches.entry(file.clone()).or_default().deleted_file = true;
            }
        }
    }
    flush(&mut patches, &current_file, &mut current_hunk);

    patches
}

/// Post-change path from the remainder of a `diff --git a/<old> b/<new>` line.
fn parse_file_header(header: &str) -> Option<String> {
    if header.ends_with('"') {
        let start = header.rfind(" \"b/")?;
        let quoted = &header[start + 4..header.len() - 1];
        return Some(quoted.replace("\\\"", "\"").replace("\\\\", "\\"));
    }
    let start = header.rfind(" b/")?;
    Some(header[start + 3..].to_string())
}

/// `(old_start, old_lines, new_start, new_lines)`; an omitted span length is 1.
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let mut tokens = line.strip_prefix("@@")?.split_whitespace();
    let old = tokens.next()?.strip_prefix('-')?;
    let new = tokens.next()?.strip_prefix('+')?;
    let (old_start, old_lines) = parse_range(old)?;
    let (new_start, new_lines) = parse_range(new)?;
    Some((old_start, old_lines, new_start, new_lines))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, lines)) => Some((start.parse().ok()?, lines.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Split a numstat rename path into `(old, new)`.
///
/// Handles both `old => new` and the compact `dir/{old => new}/file` form.
pub fn resolve_rename(path: &str) -> Option<(String, String)> {
    if !path.contains(RENAME_ARROW) {
        return None;
    }

    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let prefix = &path[..open];
            let suffix = &path[close + 1..];
            let (old_mid, new_mid) = path[open + 1..close].split_once(RENAME_ARROW)?;
            let join = |mid: &str| format!("{prefix}{mid}{suffix}").replace("//", "/");
            return Some((join(old_mid), join(new_mid)));
        }
    }

    let (old, new) = path.split_once(RENAME_ARROW)?;
    Some((old.to_string(), new.to_string()))
}

/// Status for one file, first matching rule wins.
pub fn classify(
    summary: &FileChangeSummary,
    patch: Option<&FilePatch>,
    against_empty_tree: bool,
) -> FileStatus {
    let first_hunk = patch.and_then(|p| p.hunks.first());

    if summary.path.contains(RENAME_ARROW) {
        return FileStatus::Renamed;
    }
    if against_empty_tree && first_hunk.map_or(true, |h| h.old_lines == 0) {
        return FileStatus::Added;
    }
    if patch.is_some_and(|p| p.new_file) {
        return FileStatus::Added;
    }
    if patch.is_some_and(|p| p.deleted_file) {
        return FileStatus::Deleted;
    }
    // Count-only rules need hunk evidence that the whole file appeared or vanished,
    // otherwise a pure line insertion into an existing file would read as "added".
    if summary.insertions > 0
        && summary.deletions == 0
        && first_hunk.is_some_and(|h| h.old_start == 0 && h.old_lines == 0)
    {
        return FileStatus::Added;
    }
    if summary.deletions > 0
        && summary.insertions == 0
        && first_hunk.is_some_and(|h| h.new_start == 0 && h.new_lines == 0)
    {
        return FileStatus::Deleted;
    }
    FileStatus::Modified
}

/// Combine numstat counts with parsed hunks, in numstat order.
pub fn synthesize(numstat: &str, diff_text: &str, against_empty_tree: bool) -> Vec<FileDiff> {
    let mut patches = parse_patches(diff_text);

    parse_numstat(numstat)
        .into_iter()
        .map(|summary| {
            let (old_path, file_path) = match resolve_rename(&summary.path) {
                Some((old, new)) => (Some(old), new),
                None => (None, summary.path.clone()),
            };
            let patch = patches.remove(&file_path);
            let status = classify(&summary, patch.as_ref(), against_empty_tree);
            FileDiff {
                file_path,
                old_path,
                status,
                additions: summary.insertions,
                deletions: summary.deletions,
                hunks: patch.map(|p| p.hunks).unwrap_or_default(),
            }
        })
        .collect()
}
