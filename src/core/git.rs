//! Version-control adapter for the tutorial working tree.
//!
//! [`GitRepo`] is the only component that touches repository state. Reads (ref resolution,
//! HEAD, working-tree status) go through `git2`; operations that move the tree (clone,
//! checkout, stash) and the textual diff run the `git` binary in the working directory.
//!
//! The adapter is either unbound or bound to one working tree. Everything except
//! [`GitRepo::bound_path`] fails with [`TutorialError::RepositoryNotInitialized`] while
//! unbound.

use git2::{ErrorCode, Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::{
    diff_parser::{self, FileDiff},
    error::{GitOperation, Result, TutorialError},
};

/// Object id of git's canonical empty tree.
pub const EMPTY_TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Default label for stashes made while navigating.
pub const DEFAULT_STASH_MESSAGE: &str = "git-tutorial auto-stash";

enum RepoBinding {
    Unbound,
    Bound { repo: Repository, workdir: PathBuf },
}

pub struct GitRepo {
    binding: RepoBinding,
    /// Untracked paths the tool itself relies on, excluded from dirty checks, stash and clean
    protected: Vec<String>,
}

impl Default for GitRepo {
    fn default() -> Self {
        Self::unbound()
    }
}

/// True for sources that should be cloned rather than opened in place.
pub fn is_remote_url(source: &str) -> bool {
    ["http://", "https://", "git://", "ssh://", "file://"]
        .iter()
        .any(|scheme| source.starts_with(scheme))
        || source.starts_with("git@")
}

impl GitRepo {
    pub fn unbound() -> Self {
        Self {
            binding: RepoBinding::Unbound,
            protected: Vec::new(),
        }
    }

    /// Open the working tree rooted at `path` and bind to it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut git_repo = Self::unbound();
        git_repo.bind(path)?;
        Ok(git_repo)
    }

    pub fn bind<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let repo = Repository::open(path.as_ref())?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                TutorialError::git_operation(
                    GitOperation::Status,
                    format!("'{}' is a bare repository", path.as_ref().display()),
                )
            })?
            .to_path_buf();
        log::debug!("Bound git adapter to {}", workdir.display());
        self.binding = RepoBinding::Bound { repo, workdir };
        self.protected.clear();
        Ok(())
    }

    /// Clone `remote_url` into `target_path` and bind to the new working tree.
    pub fn clone_remote(&mut self, remote_url: &str, target_path: &Path) -> Result<()> {
        log::info!("Cloning {remote_url} into {}", target_path.display());

        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(remote_url)
            .arg(target_path)
            .output()
            .map_err(|e| TutorialError::git_operation(GitOperation::Clone, e.to_string()))?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(TutorialError::git_operation(
                GitOperation::Clone,
                error_msg.trim(),
            ));
        }

        self.bind(target_path)
    }

    pub fn bound_path(&self) -> Option<&Path> {
        match &self.binding {
            RepoBinding::Unbound => None,
            RepoBinding::Bound { workdir, .. } => Some(workdir),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, RepoBinding::Bound { .. })
    }

    pub fn unbind(&mut self) {
        self.binding = RepoBinding::Unbound;
        self.protected.clear();
    }

    /// Whether `relative_path` exists in the working tree without being tracked.
    pub fn is_untracked(&self, relative_path: &str) -> Result<bool> {
        let repo = self.repository()?;
        match repo.status_file(Path::new(relative_path)) {
            Ok(status) => Ok(status.contains(Status::WT_NEW)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(TutorialError::git_operation(GitOperation::Status, e.message())),
        }
    }

    /// Keep an untracked file out of dirty checks, stashes and `discard_changes`.
    pub fn protect_untracked(&mut self, relative_path: &str) {
        if !self.protected.iter().any(|p| p == relative_path) {
            log::debug!("Protecting untracked {relative_path} from stash and clean");
            self.protected.push(relative_path.to_string());
        }
    }

    pub fn protected_paths(&self) -> &[String] {
        &self.protected
    }

    fn repository(&self) -> Result<&Repository> {
        match &self.binding {
            RepoBinding::Unbound => Err(TutorialError::RepositoryNotInitialized),
            RepoBinding::Bound { repo, .. } => Ok(repo),
        }
    }

    fn workdir(&self) -> Result<&Path> {
        self.bound_path()
            .ok_or(TutorialError::RepositoryNotInitialized)
    }

    /// Execute a git command in the working directory, returning its stdout
    fn execute_git_command(&self, operation: GitOperation, args: &[&str]) -> Result<String> {
        let workdir = self.workdir()?;
        log::debug!("Running git {} in {}", args.join(" "), workdir.display());

        let output = Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| TutorialError::git_operation(operation, e.to_string()))?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(TutorialError::git_operation(operation, error_msg.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Move HEAD (detached) to `git_ref`.
    ///
    /// Fails when the ref is unknown or local modifications would be overwritten; callers
    /// are expected to have resolved dirty state first.
    pub fn checkout(&self, git_ref: &str) -> Result<()> {
        self.execute_git_command(GitOperation::Checkout, &["checkout", "--quiet", git_ref, "--"])?;
        Ok(())
    }

    /// Structured diff from `from_ref` to `to_ref`.
    ///
    /// An empty or absent `from_ref` compares against the empty tree, so every file of
    /// `to_ref` shows as added.
    pub fn get_diff(&self, from_ref: Option<&str>, to_ref: &str) -> Result<Vec<FileDiff>> {
        let from = from_ref.filter(|r| !r.trim().is_empty());
        let against_empty_tree = from.is_none();
        let from = from.unwrap_or(EMPTY_TREE_OID);

        let numstat = self.execute_git_command(
            GitOperation::Diff,
            &["diff", "--numstat", "-M", from, to_ref, "--"],
        )?;
        let diff_text = self.execute_git_command(
            GitOperation::Diff,
            &[
                "diff",
                "-M",
                "--no-color",
                "--no-ext-diff",
                "--src-prefix=a/",
                "--dst-prefix=b/",
                from,
                to_ref,
                "--",
            ],
        )?;

        Ok(diff_parser::synthesize(
            &numstat,
            &diff_text,
            against_empty_tree,
        ))
    }

    /// True when anything is modified, staged, deleted or untracked, protected paths aside.
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let repo = self.repository()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        opts.include_ignored(false);
        opts.recurse_untracked_dirs(true);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(|e| TutorialError::git_operation(GitOperation::Status, e.message()))?;
        Ok(statuses.iter().any(|entry| {
            entry
                .path()
                .map_or(true, |path| !self.protected.iter().any(|p| p == path))
        }))
    }

    /// Stash every uncommitted change, untracked files included, under `message`.
    pub fn stash(&self, message: &str) -> Result<()> {
        let excludes: Vec<String> = self
            .protected
            .iter()
            .map(|p| format!(":(exclude){p}"))
            .collect();
        let mut args = vec!["stash", "push", "--include-untracked", "--message", message];
        if !excludes.is_empty() {
            args.extend(["--", "."]);
            args.extend(excludes.iter().map(String::as_str));
        }
        self.execute_git_command(GitOperation::Stash, &args)?;
        Ok(())
    }

    pub fn stash_pop(&self) -> Result<()> {
        self.execute_git_command(GitOperation::Stash, &["stash", "pop"])?;
        Ok(())
    }

    /// Throw away uncommitted changes, untracked files included except protected ones.
    pub fn discard_changes(&self) -> Result<()> {
        self.execute_git_command(GitOperation::Checkout, &["reset", "--hard", "--quiet"])?;
        let anchored: Vec<String> = self.protected.iter().map(|p| format!("/{p}")).collect();
        let mut clean = vec!["clean", "-fd", "--quiet"];
        for pattern in &anchored {
            clean.extend(["-e", pattern.as_str()]);
        }
        self.execute_git_command(GitOperation::Checkout, &clean)?;
        Ok(())
    }

    /// Whether `git_ref` resolves to a commit. No side effects.
    pub fn ref_exists(&self, git_ref: &str) -> Result<bool> {
        let repo = self.repository()?;
        Ok(repo
            .revparse_single(git_ref)
            .and_then(|object| object.peel_to_commit())
            .is_ok())
    }

    /// Full commit id that `git_ref` points to.
    pub fn resolve_ref(&self, git_ref: &str) -> Result<String> {
        let repo = self.repository()?;
        let commit = repo.revparse_single(git_ref)?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Commit id of HEAD.
    pub fn get_current_ref(&self) -> Result<String> {
        let repo = self.repository()?;
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }
}
