//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`TutorialError`] which covers every failure the tutorial core can
//! report. It uses `thiserror` for ergonomic error definitions and includes constructors
//! for the common failure scenarios.
//!
//! # Public API
//! - [`TutorialError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, TutorialError>`
//! - [`GitOperation`] / [`FileOperation`]: tags naming the operation that failed
//!
//! # Error Categories
//! - **Config**: document unreadable, unparseable or structurally invalid
//! - **Git operations**: clone, checkout, diff, stash and status failures
//! - **File operations**: read, write, copy and delete failures with the path involved
//! - **Tutorial state**: no tutorial loaded, unknown step, unresolvable step refs

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::validator::FieldError;

/// Version-control operation that produced a [`TutorialError::GitOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOperation {
    Clone,
    Checkout,
    Diff,
    Stash,
    Status,
}

impl fmt::Display for GitOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitOperation::Clone => "clone",
            GitOperation::Checkout => "checkout",
            GitOperation::Diff => "diff",
            GitOperation::Stash => "stash",
            GitOperation::Status => "status",
        };
        f.write_str(name)
    }
}

/// Filesystem operation that produced a [`TutorialError::FileOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Copy,
    Delete,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileOperation::Read => "read",
            FileOperation::Write => "write",
            FileOperation::Copy => "copy",
            FileOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A step whose `gitRef` could not be resolved in the tutorial repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStepRef {
    pub step_id: String,
    pub git_ref: String,
}

/// Domain-specific error types for the tutorial core
#[derive(Error, Debug)]
pub enum TutorialError {
    // Config document errors
    #[error("Failed to parse tutorial config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid tutorial config:\n{}", format_field_errors(.errors))]
    ConfigValidation { errors: Vec<FieldError> },

    #[error("No tutorial config found in '{root}'. Add a tutorial.yaml, tutorial.yml or tutorial.json")]
    ConfigNotFound { root: PathBuf },

    #[error("Unsupported config format: '{path}'. Use a .yaml, .yml or .json file")]
    UnsupportedConfigFormat { path: PathBuf },

    // Repository errors
    #[error("Git repository is not initialized. Load a tutorial first")]
    RepositoryNotInitialized,

    #[error("Git {operation} failed: {message}")]
    GitOperation {
        operation: GitOperation,
        message: String,
    },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Steps reference git refs that do not exist:\n{}", format_invalid_refs(.refs))]
    InvalidStepRefs { refs: Vec<InvalidStepRef> },

    // File operation errors
    #[error("Failed to {operation} '{path}': {source}")]
    FileOperation {
        operation: FileOperation,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Tutorial state errors
    #[error("No tutorial is loaded. Run 'git-tutorial load <path-or-url>' first")]
    TutorialNotLoaded,

    #[error("Step '{step_id}' does not exist in this tutorial")]
    StepNotFound { step_id: String },

    #[error("No step is current. Name a step or navigate to one first")]
    NoCurrentStep,

    #[error("Stored tutorial state is unreadable: {message}. Delete the file to start over")]
    StateCorrupted { message: String },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using TutorialError
pub type Result<T> = std::result::Result<T, TutorialError>;

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_invalid_refs(refs: &[InvalidStepRef]) -> String {
    refs.iter()
        .map(|r| format!("  step '{}': {}", r.step_id, r.git_ref))
        .collect::<Vec<_>>()
        .join("\n")
}

impl TutorialError {
    /// Create a git operation error carrying the tool's message
    pub fn git_operation(operation: GitOperation, message: impl Into<String>) -> Self {
        Self::GitOperation {
            operation,
            message: message.into(),
        }
    }

    /// Create a file operation error for the given path
    pub fn file_operation(
        operation: FileOperation,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileOperation {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a step not found error
    pub fn step_not_found(step_id: impl Into<String>) -> Self {
        Self::StepNotFound {
            step_id: step_id.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(root: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { root: root.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TutorialError::TutorialNotLoaded;
        assert!(err.to_string().starts_with("No tutorial is loaded"));
    }

    #[test]
    fn test_step_not_found_error() {
        let err = TutorialError::step_not_found("step-9");
        assert_eq!(err.to_string(), "Step 'step-9' does not exist in this tutorial");
    }

    #[test]
    fn test_git_operation_error_names_operation() {
        let err = TutorialError::git_operation(GitOperation::Checkout, "pathspec 'nope' did not match");
        assert_eq!(
            err.to_string(),
            "Git checkout failed: pathspec 'nope' did not match"
        );
    }

    #[test]
    fn test_file_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = TutorialError::file_operation(FileOperation::Write, "/test/state.json", io_err);
        assert!(err.to_string().contains("Failed to write"));
        assert!(err.to_string().contains("/test/state.json"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_config_validation_lists_every_error() {
        let err = TutorialError::ConfigValidation {
            errors: vec![
                FieldError::new("name", "is required and must be a string"),
                FieldError::new("steps", "must not be empty"),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("name: is required and must be a string"));
        assert!(message.contains("steps: must not be empty"));
    }

    #[test]
    fn test_invalid_step_refs_lists_every_step() {
        let err = TutorialError::InvalidStepRefs {
            refs: vec![
                InvalidStepRef {
                    step_id: "step-1".to_string(),
                    git_ref: "v1".to_string(),
                },
                InvalidStepRef {
                    step_id: "step-2".to_string(),
                    git_ref: "deadbeef".to_string(),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("step 'step-1': v1"));
        assert!(message.contains("step 'step-2': deadbeef"));
    }
}
