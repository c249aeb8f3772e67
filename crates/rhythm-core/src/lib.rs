//! # Rhythm Core Library
//!
//! Core business logic for rhythm, a routine tracker (timed checklist
//! with adaptive estimates) and habit tracker (tap-to-increment daily
//! counters with a trend window). All operations are available via the
//! standalone CLI binary; any GUI is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Routine Runner**: a wall-clock-based state machine that requires
//!   the caller to poll for display updates
//! - **Estimate Updater**: weighted-average re-estimation of task
//!   durations after each run
//! - **Event Aggregator**: local-calendar-day counts and tiled trend
//!   windows over the append-only habit event log
//! - **Storage**: a SQLite-backed key-value store holding each
//!   collection as one JSON blob, plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`RoutineRunner`]: run state machine
//! - [`RoutineRepo`] / [`HabitRepo`]: whole-collection repositories
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod habit;
pub mod routine;
pub mod storage;
pub mod timefmt;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use habit::{HabitEvent, HabitItem, HabitRepo, PressOutcome, PressTracker, TrendPoint};
pub use routine::{
    EstimateReport, Routine, RoutineRepo, RoutineRunner, RunState, Task, TaskLog, TaskUpdate,
};
pub use storage::{Config, Database};
