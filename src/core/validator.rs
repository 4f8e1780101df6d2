//! Structural validation of raw tutorial config documents.
//!
//! The validator accepts an untyped [`serde_json::Value`] (YAML documents are converted to
//! JSON values before they get here) and only trusts a field after checking its shape.
//! It never fails fast: every problem is collected, in document order and then rule order,
//! so an author sees the whole list at once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use crate::core::tutorial_config::TutorialConfig;

/// A single validation problem, addressed by a path such as `steps[2].gitRef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating a raw document.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(TutorialConfig),
    Invalid(Vec<FieldError>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Errors in report order; empty for a valid document.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Validation::Valid(_) => &[],
            Validation::Invalid(errors) => errors,
        }
    }
}

const REQUIRED_TOP_LEVEL: [&str; 3] = ["name", "description", "version"];
const REQUIRED_STEP_FIELDS: [&str; 4] = ["id", "title", "gitRef", "explanation"];
const OPTIONAL_STEP_FIELDS: [&str; 2] = ["parentId", "description"];

/// Validate a raw config value.
///
/// Returns [`Validation::Valid`] carrying the typed config when no rule is violated.
pub fn validate(raw: &Value) -> Validation {
    let errors = collect_errors(raw);
    if !errors.is_empty() {
        return Validation::Invalid(errors);
    }

    match serde_json::from_value::<TutorialConfig>(raw.clone()) {
        Ok(config) => Validation::Valid(config),
        // Only reachable if the rules above drift from the TutorialConfig definition
        Err(e) => Validation::Invalid(vec![FieldError::new("root", e.to_string())]),
    }
}

fn collect_errors(raw: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let Some(root) = raw.as_object() else {
        errors.push(FieldError::new("root", "config must be an object"));
        return errors;
    };

    for field in REQUIRED_TOP_LEVEL {
        if !is_string(root, field) {
            errors.push(FieldError::new(field, "is required and must be a string"));
        }
    }

    let steps = match root.get("steps") {
        Some(Value::Array(steps)) => steps,
        _ => {
            errors.push(FieldError::new("steps", "is required and must be an array"));
            return errors;
        }
    };

    if steps.is_empty() {
        errors.push(FieldError::new("steps", "must not be empty"));
        return errors;
    }

    // Pass 1: per-step shape and id registration
    let mut declared_ids: HashSet<&str> = HashSet::new();
    for (index, step) in steps.iter().enumerate() {
        let Some(step) = step.as_object() else {
            errors.push(FieldError::new(
                format!("steps[{index}]"),
                "step must be an object",
            ));
            continue;
        };

        for field in REQUIRED_STEP_FIELDS {
            if !is_string(step, field) {
                errors.push(FieldError::new(
                    format!("steps[{index}].{field}"),
                    "is required and must be a string",
                ));
            }
        }

        for field in OPTIONAL_STEP_FIELDS {
            if step.get(field).is_some_and(|v| !v.is_string()) {
                errors.push(FieldError::new(
                    format!("steps[{index}].{field}"),
                    "must be a string when present",
                ));
            }
        }

        if let Some(id) = step.get("id").and_then(Value::as_str) {
            if !declared_ids.insert(id) {
                errors.push(FieldError::new(
                    format!("steps[{index}].id"),
                    format!("duplicate step id '{id}'"),
                ));
            }
        }
    }

    // Pass 2: parent references against the full declared id set
    for (index, step) in steps.iter().enumerate() {
        let Some(parent_id) = step.get("parentId").and_then(Value::as_str) else {
            continue;
        };
        if !declared_ids.contains(parent_id) {
            errors.push(FieldError::new(
                format!("steps[{index}].parentId"),
                format!("parent step '{parent_id}' does not exist"),
            ));
        }
    }

    errors
}

fn is_string(object: &Map<String, Value>, field: &str) -> bool {
    object.get(field).is_some_and(Value::is_string)
}
