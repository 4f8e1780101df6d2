//! Shared utilities for git-tutorial integration tests
//!
//! Tests run against real git repositories built in temporary directories, with settings
//! and state isolated per test through the XDG environment variables.

pub mod assertions;
pub mod fixtures;
pub mod repository;
