//! Tutorial orchestration: loading, navigation and the queries collaborators use.
//!
//! [`TutorialManager`] owns the git adapter, the progress tracker and the listener
//! registry. At most one tutorial is open at a time. Every mutating method takes
//! `&mut self`, so two navigations can never overlap on the same manager; the dirty check
//! and the checkout that follows it run as one call.
//!
//! Loading is all-or-nothing: the repository is bound, the config parsed and validated,
//! every step ref checked and the graph built on locals, and only then swapped in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{
    code_refs::{self, StepExplanation},
    config::Settings,
    diff_parser::FileDiff,
    error::{InvalidStepRef, Result, TutorialError},
    events::{ListenerRegistry, SubscriptionId, TutorialEvent},
    git::{is_remote_url, GitRepo},
    progress::{ProgressTracker, StepStatus},
    step_tree::{self, build_step_tree, StepNode},
    store::KeyValueStore,
    tutorial_config::{find_config_file, parse_file, StepConfig, TutorialConfig},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    /// Stable hash of the canonical root path
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub root_path: PathBuf,
    pub config_path: PathBuf,
    pub steps: Vec<StepNode>,
    pub current_step_id: Option<String>,
}

impl Tutorial {
    pub fn step(&self, step_id: &str) -> Option<&StepNode> {
        step_tree::find_step(&self.steps, step_id)
    }

    pub fn current_step(&self) -> Option<&StepNode> {
        self.current_step_id
            .as_deref()
            .and_then(|id| self.step(id))
    }

    /// The config this tutorial was built from.
    pub fn to_config(&self) -> TutorialConfig {
        TutorialConfig {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            steps: self.steps.iter().map(StepConfig::from).collect(),
        }
    }
}

/// What to do with uncommitted work before a navigation checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirtyResolution {
    Stash,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Navigated {
        step: StepNode,
        stashed: bool,
        discarded: bool,
    },
    /// Working tree was dirty and the caller chose to cancel
    Cancelled,
}

/// Deterministic tutorial id for a root path.
pub fn tutorial_id_for(root: &Path) -> String {
    format!("{:x}", md5::compute(root.to_string_lossy().as_bytes()))
}

fn remove_clone(target: &Path) {
    if !target.exists() {
        return;
    }
    match fs::remove_dir_all(target) {
        Ok(()) => log::debug!("Removed clone at {}", target.display()),
        Err(e) => log::warn!("Could not remove clone at {}: {e}", target.display()),
    }
}

pub struct TutorialManager<S: KeyValueStore> {
    git: GitRepo,
    progress: ProgressTracker<S>,
    settings: Settings,
    current: Option<Tutorial>,
    listeners: ListenerRegistry,
}

impl<S: KeyValueStore> TutorialManager<S> {
    pub fn new(progress: ProgressTracker<S>, settings: Settings) -> Self {
        Self {
            git: GitRepo::unbound(),
            progress,
            settings,
            current: None,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TutorialEvent<'_>) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn git(&self) -> &GitRepo {
        &self.git
    }

    pub fn progress(&self) -> &ProgressTracker<S> {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressTracker<S> {
        &mut self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load a tutorial from a local working tree or a remote URL.
    ///
    /// Remote sources are cloned into a fresh directory under the configured clone
    /// directory, which is removed again if the load fails. Any failure leaves the
    /// previously open tutorial untouched.
    pub fn load_tutorial(&mut self, source: &str) -> Result<&Tutorial> {
        log::info!("Loading tutorial from {source}");

        let mut git = GitRepo::unbound();
        if is_remote_url(source) {
            let target = self.clone_target(source);
            let loaded = git
                .clone_remote(source, &target)
                .and_then(|()| self.load_from_working_tree(git));
            if let Err(e) = loaded {
                remove_clone(&target);
                return Err(e);
            }
        } else {
            git.bind(source)?;
            self.load_from_working_tree(git)?;
        }

        self.current.as_ref().ok_or(TutorialError::TutorialNotLoaded)
    }

    /// Reopen a tutorial at `root` from a config parsed by an earlier load.
    ///
    /// The config file is not read again, so the working tree may sit at a step whose
    /// commit predates the config.
    pub fn reopen_tutorial(
        &mut self,
        root: &Path,
        config_path: PathBuf,
        config: TutorialConfig,
    ) -> Result<&Tutorial> {
        log::info!("Reopening tutorial at {}", root.display());

        let mut git = GitRepo::unbound();
        git.bind(root)?;
        let root = fs::canonicalize(root)?;
        self.install(git, root, config_path, config)?;

        self.current.as_ref().ok_or(TutorialError::TutorialNotLoaded)
    }

    fn load_from_working_tree(&mut self, git: GitRepo) -> Result<()> {
        let workdir = git
            .bound_path()
            .ok_or(TutorialError::RepositoryNotInitialized)?;
        let root = fs::canonicalize(workdir)?;

        let config_path =
            find_config_file(&root).ok_or_else(|| TutorialError::config_not_found(&root))?;
        let config = parse_file(&config_path)?;

        self.install(git, root, config_path, config)
    }

    /// Check every step ref, build the graph and swap the result in.
    fn install(
        &mut self,
        mut git: GitRepo,
        root: PathBuf,
        config_path: PathBuf,
        config: TutorialConfig,
    ) -> Result<()> {
        let mut invalid_refs = Vec::new();
        for step in &config.steps {
            if !git.ref_exists(&step.git_ref)? {
                invalid_refs.push(InvalidStepRef {
                    step_id: step.id.clone(),
                    git_ref: step.git_ref.clone(),
                });
            }
        }
        if !invalid_refs.is_empty() {
            log::warn!("{} step ref(s) do not resolve", invalid_refs.len());
            return Err(TutorialError::InvalidStepRefs { refs: invalid_refs });
        }

        // An untracked config must survive checkouts, stash and discard
        if let Ok(relative) = config_path.strip_prefix(&root) {
            let relative = relative.to_string_lossy();
            if git.is_untracked(&relative)? {
                git.protect_untracked(&relative);
            }
        }

        let steps = build_step_tree(&config.steps);
        let tutorial = Tutorial {
            id: tutorial_id_for(&root),
            name: config.name,
            description: config.description,
            version: config.version,
            root_path: root,
            config_path,
            steps,
            current_step_id: None,
        };

        log::info!(
            "Loaded tutorial '{}' with {} step(s)",
            tutorial.name,
            tutorial.steps.len()
        );

        self.progress.get_progress(&tutorial.id);
        self.git = git;
        self.current = Some(tutorial);

        if let Some(tutorial) = self.current.as_ref() {
            self.listeners
                .emit(&TutorialEvent::TutorialLoaded(tutorial));
        }
        Ok(())
    }

    fn clone_target(&self, source: &str) -> PathBuf {
        let hash = format!("{:x}", md5::compute(source.as_bytes()));
        let stamp = chrono::Utc::now().timestamp_millis();
        self.settings
            .clone_directory
            .join(format!("git-tutorial-{}-{stamp}", &hash[..12]))
    }

    /// Check out `step_id`, consulting `on_dirty` only when the working tree has
    /// uncommitted changes.
    ///
    /// On any failure, including a cancelled resolution, the current step is unchanged.
    pub fn navigate_to_step<F>(&mut self, step_id: &str, on_dirty: F) -> Result<NavigationOutcome>
    where
        F: FnOnce() -> DirtyResolution,
    {
        let tutorial = self.current.as_ref().ok_or(TutorialError::TutorialNotLoaded)?;
        let step = tutorial
            .step(step_id)
            .cloned()
            .ok_or_else(|| TutorialError::step_not_found(step_id))?;
        let tutorial_id = tutorial.id.clone();

        let mut stashed = false;
        let mut discarded = false;
        if self.git.has_uncommitted_changes()? {
            match on_dirty() {
                DirtyResolution::Cancel => {
                    log::info!("Navigation to '{step_id}' cancelled: working tree has changes");
                    return Ok(NavigationOutcome::Cancelled);
                }
                DirtyResolution::Stash => {
                    self.git.stash(&self.settings.stash_message)?;
                    stashed = true;
                }
                DirtyResolution::Discard => {
                    self.git.discard_changes()?;
                    discarded = true;
                }
            }
        }

        self.git.checkout(&step.git_ref)?;
        log::info!("Checked out step '{}' at {}", step.id, step.git_ref);

        if let Some(tutorial) = self.current.as_mut() {
            tutorial.current_step_id = Some(step.id.clone());
        }
        self.progress.set_current_step(&tutorial_id, &step.id)?;

        self.listeners.emit(&TutorialEvent::StepChanged(&step));

        Ok(NavigationOutcome::Navigated {
            step,
            stashed,
            discarded,
        })
    }

    pub fn get_current_tutorial(&self) -> Option<&Tutorial> {
        self.current.as_ref()
    }

    pub fn get_current_step(&self) -> Option<&StepNode> {
        self.current.as_ref().and_then(Tutorial::current_step)
    }

    /// Forget the open tutorial. Files and the working tree are left as they are.
    pub fn close_tutorial(&mut self) {
        if let Some(tutorial) = self.current.take() {
            log::info!("Closed tutorial '{}'", tutorial.name);
        }
        self.git.unbind();
    }

    fn tutorial(&self) -> Result<&Tutorial> {
        self.current.as_ref().ok_or(TutorialError::TutorialNotLoaded)
    }

    fn step(&self, step_id: &str) -> Result<&StepNode> {
        self.tutorial()?
            .step(step_id)
            .ok_or_else(|| TutorialError::step_not_found(step_id))
    }

    /// Changes introduced by `step_id` relative to its parent; roots compare against
    /// the empty tree.
    pub fn step_diff(&self, step_id: &str) -> Result<Vec<FileDiff>> {
        let step = self.step(step_id)?;
        let parent_ref = step
            .parent_id
            .as_deref()
            .and_then(|parent| self.tutorial().ok()?.step(parent))
            .map(|parent| parent.git_ref.as_str());
        self.git.get_diff(parent_ref, &step.git_ref)
    }

    /// Changes between any two steps; `None` for `from_step` means the empty tree.
    pub fn diff_between(&self, from_step: Option<&str>, to_step: &str) -> Result<Vec<FileDiff>> {
        let to = self.step(to_step)?;
        let from = match from_step {
            Some(id) => Some(self.step(id)?.git_ref.as_str()),
            None => None,
        };
        self.git.get_diff(from, &to.git_ref)
    }

    pub fn get_step_status(&self, step_id: &str) -> Result<StepStatus> {
        let tutorial = self.tutorial()?;
        Ok(self.progress.get_step_status(&tutorial.id, step_id))
    }

    pub fn step_statuses(&self) -> Result<Vec<(String, StepStatus)>> {
        let tutorial = self.tutorial()?;
        Ok(self.progress.step_statuses(&tutorial.id, &tutorial.steps))
    }

    pub fn mark_current_completed(&mut self) -> Result<()> {
        let tutorial = self.tutorial()?;
        let Some(step_id) = tutorial.current_step_id.clone() else {
            return Ok(());
        };
        let tutorial_id = tutorial.id.clone();
        self.progress.mark_step_completed(&tutorial_id, &step_id)
    }

    pub fn reset_progress(&mut self) -> Result<()> {
        let tutorial_id = self.tutorial()?.id.clone();
        self.progress.reset_progress(&tutorial_id)?;
        if let Some(tutorial) = self.current.as_mut() {
            tutorial.current_step_id = None;
        }
        Ok(())
    }

    /// Seed the current step from persisted progress without touching the working tree.
    ///
    /// Used when reattaching to a tutorial that was navigated in an earlier session.
    pub fn restore_current_step(&mut self) -> Result<Option<&StepNode>> {
        let tutorial = self.current.as_mut().ok_or(TutorialError::TutorialNotLoaded)?;
        let saved = self
            .progress
            .progress(&tutorial.id)
            .and_then(|record| record.current_step_id.clone())
            .filter(|id| step_tree::find_step(&tutorial.steps, id).is_some());
        tutorial.current_step_id = saved;
        Ok(tutorial.current_step())
    }

    /// First child of the current step, or the first root when no step is current.
    pub fn next_step(&self) -> Result<Option<&StepNode>> {
        let tutorial = self.tutorial()?;
        Ok(match tutorial.current_step_id.as_deref() {
            Some(current) => step_tree::children_of(&tutorial.steps, current)
                .into_iter()
                .next(),
            None => step_tree::roots(&tutorial.steps).into_iter().next(),
        })
    }

    pub fn explanation(&self, step_id: &str) -> Result<StepExplanation> {
        let tutorial = self.tutorial()?;
        let step = self.step(step_id)?;
        code_refs::load_explanation(&tutorial.root_path, step)
    }

    /// Restore the most recent stash, typically one made by a stash resolution.
    pub fn stash_pop(&self) -> Result<()> {
        self.tutorial()?;
        self.git.stash_pop()
    }
}
