use std::path::PathBuf;
use crate::core::error::Result;

const APP_DIR_NAME: &str = "git-tutorial";

pub fn get_config_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => {
            std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config"))
        },
        "macos" => {
            dirs::home_dir()
                .unwrap_or_default()
                .join("Library/Application Support")
        },
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join(APP_DIR_NAME))
}

/// Progress and session state live here, apart from user-editable settings.
pub fn get_data_directory() -> Result<PathBuf> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => {
            std::env::var("XDG_DATA_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".local/share"))
        },
        "macos" => {
            dirs::home_dir()
                .unwrap_or_default()
                .join("Library/Application Support")
        },
        _ => dirs::data_dir().unwrap_or_default(),
    };

    Ok(base.join(APP_DIR_NAME))
}

pub fn get_state_file() -> Result<PathBuf> {
    Ok(get_data_directory()?.join("state.json"))
}
