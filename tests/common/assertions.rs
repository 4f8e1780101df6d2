//! Predicates and command builders for CLI output checks

#![allow(dead_code)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

/// `git-tutorial` with settings and state isolated under `home`, colors off.
pub fn tutorial_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("git-tutorial").expect("binary is built");
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

pub fn error_line() -> impl Predicate<str> {
    predicates::str::contains("✕ Error:")
}

pub fn not_loaded() -> impl Predicate<str> {
    predicates::str::contains("No tutorial is loaded")
}

pub fn now_at_step(step_id: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Now at step '{step_id}'"))
}
