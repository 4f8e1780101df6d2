//! Predefined tutorial repositories
//!
//! [`create_tutorial_repo`] builds a three-step linear tutorial plus one branch step:
//!
//! ```text
//! setup (step-1) ── library (step-2) ── rename (step-3)
//!              └── tests (step-1b)
//! ```
//!
//! `tutorial.yaml` and every narrative are committed in the first commit, so they exist at
//! every step.

#![allow(dead_code)]

use super::repository::*;
use git_tutorial::core::error::Result;

pub const TUTORIAL_YAML: &str = r#"name: Build a CLI
description: A short tour through a growing project
version: 1.0.0
steps:
  - id: setup
    title: Project setup
    gitRef: step-1
    explanation: docs/setup.md
  - id: library
    title: Extract a library
    description: Move the greeting into lib.rs
    gitRef: step-2
    parentId: setup
    explanation: docs/library.md
  - id: rename
    title: Rename the module
    gitRef: step-3
    parentId: library
    explanation: docs/rename.md
  - id: tests
    title: Add tests
    gitRef: step-1b
    parentId: setup
    explanation: docs/tests.md
"#;

pub const MAIN_V1: &str = "fn main() {\n    println!(\"hello\");\n}\n";
pub const MAIN_V2: &str = "fn main() {\n    println!(\"{}\", demo::greet());\n}\n";
pub const LIB_RS: &str = "pub fn greet() -> &'static str {\n    \"hello\"\n}\n";

pub fn create_tutorial_repo() -> Result<TestRepo> {
    create_tutorial_repo_with_config("tutorial.yaml", TUTORIAL_YAML)
}

pub fn create_tutorial_repo_with_config(config_name: &str, config: &str) -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    let path = repo.path.clone();

    create_file(&path, config_name, config)?;
    create_file(&path, "README.md", "# Demo\n")?;
    create_file(&path, "src/main.rs", MAIN_V1)?;
    create_file(&path, "docs/setup.md", "# Setup\n\nStart with a binary.\n<!-- code-ref: src/main.rs:1-3 -->\n")?;
    create_file(&path, "docs/library.md", "# Library\n\n<!-- code-ref: src/lib.rs:1-3 -->\nThen call it.\n<!-- code-ref: src/main.rs:2 -->\n")?;
    create_file(&path, "docs/rename.md", "# Rename\n")?;
    create_file(&path, "docs/tests.md", "# Tests\n")?;
    git_add(&path, ".")?;
    git_commit(&path, "Project setup")?;
    git_tag(&path, "step-1")?;

    create_file(&path, "src/main.rs", MAIN_V2)?;
    create_file(&path, "src/lib.rs", LIB_RS)?;
    git_add(&path, ".")?;
    git_commit(&path, "Extract a library")?;
    git_tag(&path, "step-2")?;

    git_mv(&path, "src/lib.rs", "src/core.rs")?;
    create_file(&path, "README.md", "# Demo\n\nNow with a core module.\n")?;
    git_add(&path, ".")?;
    git_commit(&path, "Rename the module")?;
    git_tag(&path, "step-3")?;

    git(&path, &["checkout", "--quiet", "step-1"])?;
    git(&path, &["checkout", "--quiet", "-b", "tests-branch"])?;
    create_file(&path, "tests/smoke.rs", "#[test]\nfn smoke() {}\n")?;
    git_add(&path, ".")?;
    git_commit(&path, "Add tests")?;
    git_tag(&path, "step-1b")?;

    git(&path, &["checkout", "--quiet", "step-3"])?;
    Ok(repo)
}

/// Tutorial whose config names refs that were never created.
pub fn create_repo_with_missing_refs() -> Result<TestRepo> {
    let config = "name: Broken\ndescription: Refs are missing\nversion: 0.1.0\nsteps:\n  - id: one\n    title: One\n    gitRef: step-1\n    explanation: docs/one.md\n  - id: two\n    title: Two\n    gitRef: nope-2\n    parentId: one\n    explanation: docs/two.md\n  - id: three\n    title: Three\n    gitRef: nope-3\n    explanation: docs/three.md\n";
    let repo = setup_test_repo()?;
    create_file(&repo.path, "tutorial.yaml", config)?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Only commit")?;
    git_tag(&repo.path, "step-1")?;
    Ok(repo)
}

pub const LATE_TUTORIAL_YAML: &str = "name: Late config\ndescription: The config comes after the steps\nversion: 0.2.0\nsteps:\n  - id: one\n    title: One\n    gitRef: s1\n    explanation: docs/one.md\n  - id: two\n    title: Two\n    gitRef: s2\n    parentId: one\n    explanation: docs/two.md\n";

/// Two tagged steps on `a.txt`, with `tutorial.yaml` written only after the last tag.
/// When `commit` is false the config stays untracked.
pub fn create_repo_with_late_config(commit: bool) -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    let path = repo.path.clone();

    create_file(&path, "a.txt", "one\n")?;
    git_add(&path, ".")?;
    git_commit(&path, "First step")?;
    git_tag(&path, "s1")?;

    create_file(&path, "a.txt", "one\ntwo\n")?;
    git_add(&path, ".")?;
    git_commit(&path, "Second step")?;
    git_tag(&path, "s2")?;

    create_file(&path, "tutorial.yaml", LATE_TUTORIAL_YAML)?;
    if commit {
        git_add(&path, "tutorial.yaml")?;
        git_commit(&path, "Add tutorial config")?;
    }
    Ok(repo)
}

/// Bare copy of `repo` under `dir`, loadable through a `file://` URL.
pub fn create_bare_copy(repo: &TestRepo, dir: &std::path::Path) -> Result<String> {
    let bare = dir.join("remote.git");
    let source = repo.source();
    let target = bare.to_string_lossy();
    git(dir, &["clone", "--quiet", "--bare", source.as_str(), target.as_ref()])?;
    Ok(format!("file://{}", bare.display()))
}
