use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routine::runner::RunState;

/// Every run lifecycle change produces an Event. The CLI prints them as
/// JSON; the presentation layer consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    RunStarted {
        routine_id: String,
        routine_name: String,
        task_count: usize,
        at: DateTime<Utc>,
    },
    TaskStarted {
        task_index: usize,
        task_id: String,
        task_name: String,
        estimated_seconds: u32,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_index: usize,
        task_id: String,
        actual_seconds: u32,
        at: DateTime<Utc>,
    },
    RunFinished {
        routine_id: String,
        task_count: usize,
        at: DateTime<Utc>,
    },
    RunAbandoned {
        routine_id: String,
        completed_tasks: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: RunState,
        task_index: usize,
        task_name: String,
        estimated_seconds: u32,
        elapsed_seconds: u32,
        remaining_seconds: i64,
        /// Countdown as `MM:SS`, or `+ MM:SS` once over the estimate.
        display: String,
        at: DateTime<Utc>,
    },
}
