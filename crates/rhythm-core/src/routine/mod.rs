//! Routine tracker: models, repository, estimate updater, runner.

pub mod estimate;
pub mod repo;
pub mod runner;

pub use estimate::{EstimateReport, TaskUpdate};
pub use repo::RoutineRepo;
pub use runner::{RoutineRunner, RunState};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A single step in a routine.
///
/// The id stays stable across edits so run logs can be correlated back
/// to the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub estimated_seconds: u32,
    /// Opaque image blob (data URL); capture/encoding is external.
    #[serde(default)]
    pub image: Option<String>,
}

impl Task {
    pub fn new(name: impl Into<String>, estimated_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            estimated_seconds,
            image: None,
        }
    }
}

/// An ordered checklist of timed tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
    /// When true, finishing a run re-estimates each task's duration.
    /// Missing in older persisted data, which must read as true.
    #[serde(default = "default_true")]
    pub auto_update_estimates: bool,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Routine {
    pub fn new(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tasks,
            auto_update_estimates: true,
            image: None,
        }
    }

    /// Check the invariants a routine must satisfy before it is saved.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "a routine needs a name".to_string(),
            });
        }
        if self.tasks.is_empty() {
            return Err(ValidationError::EmptyCollection("tasks".to_string()));
        }
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "tasks.name".to_string(),
                    message: "a task needs a name".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Measured duration for one task of a finished (or in-progress) run.
///
/// Consumed once by the estimate updater and then discarded; never part
/// of the persisted routine collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLog {
    pub task_id: String,
    pub actual_seconds: u32,
}
