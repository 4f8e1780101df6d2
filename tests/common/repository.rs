//! Git repository management and setup utilities

#![allow(dead_code)]

use git_tutorial::core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// The TempDir must be kept alive for the duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as the string form `load_tutorial` takes.
    pub fn source(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Runs git in `repo_path`, returning stdout. Panics with stderr on failure so a broken
/// fixture is obvious.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(repo_path).output()?;
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Sets up a fresh git repository with identity configured to avoid prompts.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "--quiet"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Writes `content` to `filename`, creating parent directories.
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

pub fn git_add(repo_path: &Path, filename: &str) -> Result<()> {
    git(repo_path, &["add", filename])?;
    Ok(())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "--quiet", "-m", message])?;
    Ok(())
}

pub fn git_tag(repo_path: &Path, tag: &str) -> Result<()> {
    git(repo_path, &["tag", tag])?;
    Ok(())
}

pub fn git_mv(repo_path: &Path, from: &str, to: &str) -> Result<()> {
    git(repo_path, &["mv", from, to])?;
    Ok(())
}

/// Full hash of the commit HEAD points at.
pub fn head_commit(repo_path: &Path) -> Result<String> {
    Ok(git(repo_path, &["rev-parse", "HEAD"])?.trim().to_string())
}

pub fn tag_commit(repo_path: &Path, tag: &str) -> Result<String> {
    let spec = format!("{tag}^{{commit}}");
    Ok(git(repo_path, &["rev-parse", &spec])?.trim().to_string())
}

pub fn stash_count(repo_path: &Path) -> Result<usize> {
    Ok(git(repo_path, &["stash", "list"])?.lines().count())
}
