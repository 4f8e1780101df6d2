//! Core functionality for the git-tutorial tool.
//!
//! This module provides the building blocks of a tutorial session: config parsing and
//! validation, the step graph, the git adapter, diff synthesis, progress persistence and
//! the manager that ties them together.

pub mod code_refs;
pub mod config;
pub mod diff_parser;
pub mod dirs;
pub mod error;
pub mod events;
pub mod file_status;
pub mod git;
pub mod manager;
pub mod output;
pub mod progress;
pub mod step_tree;
pub mod store;
pub mod tutorial_config;
pub mod validator;

// === Error handling ===
pub use error::{InvalidStepRef, Result, TutorialError};

// === Config documents ===
// Parsing tutorial.yaml / tutorial.json and checking their shape
pub use tutorial_config::{StepConfig, TutorialConfig, CONFIG_FILE_NAMES};
pub use validator::{validate, FieldError, Validation};

// === Step graph ===
pub use step_tree::{build_step_tree, StepNode};

// === Git access ===
// Checkout, stash and diff against the bound working tree
pub use git::GitRepo;
pub use diff_parser::{DiffHunk, FileDiff};
pub use file_status::FileStatus;

// === Session state ===
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use progress::{ProgressTracker, StepStatus, TutorialProgress, PROGRESS_KEY};
pub use config::Settings;

// === Orchestration ===
pub use events::{SubscriptionId, TutorialEvent};
pub use manager::{DirtyResolution, NavigationOutcome, Tutorial, TutorialManager};
pub use code_refs::{CodeRef, StepExplanation};

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success};
