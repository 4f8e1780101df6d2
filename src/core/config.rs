use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::{FileOperation, Result, TutorialError};
use crate::core::git::DEFAULT_STASH_MESSAGE;
use crate::core::manager::DirtyResolution;

/// User settings stored as `config.json` in the config directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Remote tutorials are cloned into fresh subdirectories of this directory
    pub clone_directory: PathBuf,
    pub stash_message: String,
    /// Used by the CLI when navigation finds uncommitted changes and no flag was given
    pub on_dirty: DirtyResolution,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clone_directory: std::env::temp_dir(),
            stash_message: DEFAULT_STASH_MESSAGE.to_string(),
            on_dirty: DirtyResolution::Cancel,
        }
    }
}

impl Settings {
    pub fn load_or_create_in(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .map_err(|e| TutorialError::file_operation(FileOperation::Read, &config_file, e))?;
            serde_json::from_str(&content)
                .map_err(|e| TutorialError::config_parse(&config_file, e.to_string()))
        } else {
            let settings = Self::default();
            settings.save_in(config_dir)?;
            log::debug!("Created default settings at {}", config_file.display());
            Ok(settings)
        }
    }

    pub fn save_in(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| TutorialError::file_operation(FileOperation::Write, config_dir, e))?;

        let config_file = config_dir.join("config.json");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_file, content)
            .map_err(|e| TutorialError::file_operation(FileOperation::Write, &config_file, e))?;

        Ok(())
    }
}
