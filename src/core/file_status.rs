//! Type-safe change status for files in a step diff.
//!
//! # Public API
//! - [`FileStatus`]: added, modified, deleted or renamed
//!
//! Serializes as the lower-case name (`"added"`, ...) so collaborators reading JSON
//! snapshots see the same words the CLI prints.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File introduced by the step (A)
    Added,
    /// File changed in place (M)
    Modified,
    /// File removed by the step (D)
    Deleted,
    /// File moved, possibly with edits (R)
    Renamed,
}

impl FileStatus {
    /// Single-letter symbol used in listings
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "A",
            FileStatus::Modified => "M",
            FileStatus::Deleted => "D",
            FileStatus::Renamed => "R",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Renamed => "renamed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_status_as_str() {
        assert_eq!(FileStatus::Added.as_str(), "A");
        assert_eq!(FileStatus::Modified.as_str(), "M");
        assert_eq!(FileStatus::Deleted.as_str(), "D");
        assert_eq!(FileStatus::Renamed.as_str(), "R");
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(format!("{}", FileStatus::Added), "added");
        assert_eq!(format!("{}", FileStatus::Renamed), "renamed");
    }

    #[test]
    fn test_file_status_serializes_lowercase() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&FileStatus::Deleted)?, "\"deleted\"");
        assert_eq!(
            serde_json::from_str::<FileStatus>("\"modified\"")?,
            FileStatus::Modified
        );
        Ok(())
    }
}
