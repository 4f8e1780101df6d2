//! Tutorial config documents: the author-facing model and its YAML/JSON encodings.
//!
//! # Public API
//! - [`TutorialConfig`] / [`StepConfig`]: typed form of a validated document
//! - [`ConfigFormat`]: document encoding, selected by file extension
//! - [`parse_file`] / [`parse_str`]: read, deserialize and validate a document
//! - [`serialize_to_yaml`] / [`serialize_to_json`]: inverse of parsing for valid configs
//! - [`find_config_file`]: locate the config document at a tutorial root
//!
//! YAML is parsed into a `serde_yaml::Value` and converted into a `serde_json::Value`, so both
//! encodings go through the same validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{FileOperation, Result, TutorialError};
use crate::core::validator::{validate, Validation};

/// Config filenames recognized at a tutorial root, in preference order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["tutorial.yaml", "tutorial.yml", "tutorial.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Commit hash or tag name
    pub git_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Path of the narrative Markdown, relative to the tutorial root
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Read and validate the config document at `path`.
///
/// The format is chosen from the file extension. Parse failures report
/// [`TutorialError::ConfigParse`]; structural problems report
/// [`TutorialError::ConfigValidation`] with the full error list.
pub fn parse_file(path: &Path) -> Result<TutorialConfig> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        TutorialError::UnsupportedConfigFormat {
            path: path.to_path_buf(),
        }
    })?;

    log::debug!("Parsing tutorial config {} as {format:?}", path.display());

    let content = fs::read_to_string(path)
        .map_err(|e| TutorialError::file_operation(FileOperation::Read, path, e))?;

    parse_str(&content, format).map_err(|e| match e {
        TutorialError::ConfigParse { message, .. } => TutorialError::config_parse(path, message),
        other => other,
    })
}

/// Parse and validate a document held in memory.
pub fn parse_str(content: &str, format: ConfigFormat) -> Result<TutorialConfig> {
    let raw = to_raw_value(content, format)?;
    match validate(&raw) {
        Validation::Valid(config) => Ok(config),
        Validation::Invalid(errors) => Err(TutorialError::ConfigValidation { errors }),
    }
}

/// Deserialize a document into an untyped value without validating it.
pub fn to_raw_value(content: &str, format: ConfigFormat) -> Result<Value> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| TutorialError::config_parse(PathBuf::new(), e.to_string())),
        ConfigFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)
                .map_err(|e| TutorialError::config_parse(PathBuf::new(), e.to_string()))?;
            serde_json::to_value(yaml)
                .map_err(|e| TutorialError::config_parse(PathBuf::new(), e.to_string()))
        }
    }
}

pub fn serialize_to_yaml(config: &TutorialConfig) -> Result<String> {
    serde_yaml::to_string(config)
        .map_err(|e| TutorialError::config_parse(PathBuf::new(), e.to_string()))
}

pub fn serialize_to_json(config: &TutorialConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// First recognized config file at `root`, if any.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
}
