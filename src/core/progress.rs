//! Per-tutorial progress tracking.
//!
//! [`ProgressTracker`] keeps one [`TutorialProgress`] record per tutorial id and writes the
//! whole mapping to its [`KeyValueStore`] under [`PROGRESS_KEY`] after every mutation.
//! [`ProgressTracker::get_step_status`] is the only place step status is derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::{
    error::Result,
    step_tree::StepNode,
    store::KeyValueStore,
};

/// Store key holding the serialized progress mapping.
pub const PROGRESS_KEY: &str = "gitTutorial.progress";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialProgress {
    pub tutorial_id: String,
    pub current_step_id: Option<String>,
    /// Completion order, no duplicates
    pub completed_steps: Vec<String>,
    pub last_access_time: DateTime<Utc>,
}

impl TutorialProgress {
    pub fn new(tutorial_id: impl Into<String>) -> Self {
        Self {
            tutorial_id: tutorial_id.into(),
            current_step_id: None,
            completed_steps: Vec::new(),
            last_access_time: Utc::now(),
        }
    }

    pub fn is_completed(&self, step_id: &str) -> bool {
        self.completed_steps.iter().any(|id| id == step_id)
    }

    /// Returns false when the step was already recorded.
    fn complete(&mut self, step_id: &str) -> bool {
        if self.is_completed(step_id) {
            return false;
        }
        self.completed_steps.push(step_id.to_string());
        true
    }

    fn touch(&mut self) {
        self.last_access_time = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Current,
    Completed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepStatus::Pending => "pending",
            StepStatus::Current => "current",
            StepStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

pub type ProgressMap = BTreeMap<String, TutorialProgress>;

pub fn serialize_progress(records: &ProgressMap) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

pub fn deserialize_progress(data: &str) -> Result<ProgressMap> {
    Ok(serde_json::from_str(data)?)
}

pub struct ProgressTracker<S: KeyValueStore> {
    store: S,
    records: ProgressMap,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Read the persisted mapping from `store`.
    ///
    /// An unreadable mapping is logged and replaced by an empty one; it is overwritten on
    /// the next mutation.
    pub fn load(store: S) -> Result<Self> {
        let records = match store.get(PROGRESS_KEY)? {
            Some(data) => deserialize_progress(&data).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable progress data: {e}");
                ProgressMap::new()
            }),
            None => ProgressMap::new(),
        };
        log::debug!("Loaded progress for {} tutorial(s)", records.len());
        Ok(Self { store, records })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn records(&self) -> &ProgressMap {
        &self.records
    }

    /// Existing record for `tutorial_id`, created empty on first access.
    pub fn get_progress(&mut self, tutorial_id: &str) -> &TutorialProgress {
        self.record_mut(tutorial_id)
    }

    /// Read-only lookup that never creates a record.
    pub fn progress(&self, tutorial_id: &str) -> Option<&TutorialProgress> {
        self.records.get(tutorial_id)
    }

    fn record_mut(&mut self, tutorial_id: &str) -> &mut TutorialProgress {
        self.records
            .entry(tutorial_id.to_string())
            .or_insert_with(|| TutorialProgress::new(tutorial_id))
    }

    pub fn mark_step_completed(&mut self, tutorial_id: &str, step_id: &str) -> Result<()> {
        let record = self.record_mut(tutorial_id);
        let changed = record.complete(step_id);
        record.touch();
        if changed {
            log::debug!("Marked step '{step_id}' completed in {tutorial_id}");
            self.persist()?;
        }
        Ok(())
    }

    /// Make `step_id` current, completing whichever different step was current before.
    pub fn set_current_step(&mut self, tutorial_id: &str, step_id: &str) -> Result<()> {
        let record = self.record_mut(tutorial_id);
        if let Some(previous) = record.current_step_id.take() {
            if previous != step_id {
                record.complete(&previous);
            }
        }
        record.current_step_id = Some(step_id.to_string());
        record.touch();
        log::debug!("Current step of {tutorial_id} is now '{step_id}'");
        self.persist()
    }

    pub fn get_step_status(&self, tutorial_id: &str, step_id: &str) -> StepStatus {
        let Some(record) = self.records.get(tutorial_id) else {
            return StepStatus::Pending;
        };
        if record.current_step_id.as_deref() == Some(step_id) {
            StepStatus::Current
        } else if record.is_completed(step_id) {
            StepStatus::Completed
        } else {
            StepStatus::Pending
        }
    }

    /// Status of every step, in step order.
    pub fn step_statuses(&self, tutorial_id: &str, steps: &[StepNode]) -> Vec<(String, StepStatus)> {
        steps
            .iter()
            .map(|step| (step.id.clone(), self.get_step_status(tutorial_id, &step.id)))
            .collect()
    }

    pub fn reset_progress(&mut self, tutorial_id: &str) -> Result<()> {
        self.records.insert(
            tutorial_id.to_string(),
            TutorialProgress::new(tutorial_id),
        );
        log::info!("Reset progress for {tutorial_id}");
        self.persist()
    }

    pub fn delete_progress(&mut self, tutorial_id: &str) -> Result<()> {
        if self.records.remove(tutorial_id).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let data = serialize_progress(&self.records)?;
        self.store.set(PROGRESS_KEY, data)
    }
}
