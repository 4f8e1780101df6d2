//! Git Tutorial - step-by-step code tutorials backed by git history.
//!
//! A tutorial is a git repository whose root holds a `tutorial.yaml` (or `.yml`/`.json`)
//! naming an ordered set of steps. Each step points at a git ref and a Markdown narrative.
//! Navigating to a step checks out its ref; diffs between steps are synthesized from git.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Config parsing and validation
//! - The step graph
//! - Git checkout, stash and diff access
//! - Progress persistence
//! - [`TutorialManager`], which coordinates a session

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    build_step_tree,
    validate,
    CodeRef,
    DiffHunk,
    DirtyResolution,
    FieldError,
    FileDiff,
    FileStatus,
    FileStore,
    GitRepo,
    KeyValueStore,
    MemoryStore,
    NavigationOutcome,
    ProgressTracker,
    Result,
    Settings,
    StepConfig,
    StepExplanation,
    StepNode,
    StepStatus,
    Tutorial,
    TutorialConfig,
    TutorialError,
    TutorialEvent,
    TutorialManager,
    TutorialProgress,
    Validation,
};
