//! Session persistence shared by every command.
//!
//! Each invocation is a fresh process, so the tutorial opened by `load` is remembered in
//! the state file under [`SESSION_KEY`] and reopened by the other commands.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::{
    config::Settings,
    dirs,
    error::{Result, TutorialError},
    manager::{Tutorial, TutorialManager},
    print_info, print_success,
    progress::ProgressTracker,
    store::{FileStore, KeyValueStore},
    tutorial_config::TutorialConfig,
};

pub const SESSION_KEY: &str = "gitTutorial.session";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Working tree of the open tutorial, the clone directory for remote sources
    pub root_path: PathBuf,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    /// Config as parsed at load; later steps may check out commits without the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TutorialConfig>,
}

impl Session {
    pub fn for_tutorial(tutorial: &Tutorial, source: &str) -> Self {
        Self {
            root_path: tutorial.root_path.clone(),
            source: source.to_string(),
            config_path: Some(tutorial.config_path.clone()),
            config: Some(tutorial.to_config()),
        }
    }
}

/// Where settings and state live for one invocation.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub config_dir: PathBuf,
    pub state_file: PathBuf,
}

impl SessionPaths {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            config_dir: dirs::get_config_directory()?,
            state_file: dirs::get_state_file()?,
        })
    }

    pub fn in_dir(base: &Path) -> Self {
        Self {
            config_dir: base.join("config"),
            state_file: base.join("data").join("state.json"),
        }
    }
}

pub type CliManager = TutorialManager<FileStore>;

pub fn open_manager(paths: &SessionPaths) -> Result<CliManager> {
    let settings = Settings::load_or_create_in(&paths.config_dir)?;
    let progress = ProgressTracker::load(FileStore::new(&paths.state_file))?;
    Ok(TutorialManager::new(progress, settings))
}

pub fn read_session(manager: &CliManager) -> Result<Option<Session>> {
    let Some(data) = manager.progress().store().get(SESSION_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| TutorialError::StateCorrupted {
            message: format!("session record: {e}"),
        })
}

pub fn save_session(manager: &mut CliManager, session: &Session) -> Result<()> {
    let data = serde_json::to_string(session)?;
    manager.progress_mut().store_mut().set(SESSION_KEY, data)
}

/// Reopen the tutorial remembered by the last `load`, with its current step restored.
pub fn attach(paths: &SessionPaths) -> Result<CliManager> {
    let mut manager = open_manager(paths)?;
    let session = read_session(&manager)?.ok_or(TutorialError::TutorialNotLoaded)?;
    log::debug!("Reattaching to {}", session.root_path.display());

    match (session.config_path, session.config) {
        (Some(config_path), Some(config)) => {
            manager.reopen_tutorial(&session.root_path, config_path, config)?;
        }
        _ => {
            manager.load_tutorial(&session.root_path.to_string_lossy())?;
        }
    }
    manager.restore_current_step()?;
    Ok(manager)
}

/// Explicit step id, or the current step when none is given.
pub fn resolve_step_id(manager: &CliManager, step_id: Option<String>) -> Result<String> {
    match step_id {
        Some(id) => Ok(id),
        None => manager
            .get_current_step()
            .map(|step| step.id.clone())
            .ok_or(TutorialError::NoCurrentStep),
    }
}

pub fn execute_close(paths: &SessionPaths) -> Result<()> {
    let mut manager = open_manager(paths)?;
    let session = read_session(&manager)?;
    manager.progress_mut().store_mut().remove(SESSION_KEY)?;
    manager.close_tutorial();

    match session {
        Some(session) => print_success(&format!(
            "Closed tutorial at {}. Progress is kept for next time",
            session.root_path.display()
        )),
        None => print_info("No tutorial is open"),
    }
    Ok(())
}
