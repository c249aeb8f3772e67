//! Routine runner.
//!
//! A wall-clock-based state machine with no internal thread -- the
//! caller polls `snapshot()` for display refreshes (the original UI did
//! so once a second) and drives it with `advance()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(task_index) -> Running(task_index + 1) -> ... -> Finished
//! ```
//!
//! Each advance captures a [`TaskLog`] with the elapsed wall-clock
//! seconds for the task just completed. Elapsed time is uncapped; a
//! task may run past its estimate and is then displayed as an overrun.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timefmt::format_remaining;

use super::{Routine, Task, TaskLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

/// State machine for one run of a routine.
///
/// Serializable so an in-progress run survives process exit; the CLI
/// persists it in the key-value store between commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRunner {
    /// Snapshot of the routine at run start.
    routine: Routine,
    state: RunState,
    task_index: usize,
    /// Wall-clock start (ms since epoch) of the current task.
    #[serde(default)]
    task_started_ms: Option<u64>,
    logs: Vec<TaskLog>,
}

impl RoutineRunner {
    pub fn new(routine: Routine) -> Self {
        Self {
            routine,
            state: RunState::Idle,
            task_index: 0,
            task_started_ms: None,
            logs: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn task_index(&self) -> usize {
        self.task_index
    }

    pub fn current_task(&self) -> Option<&Task> {
        match self.state {
            RunState::Running => self.routine.tasks.get(self.task_index),
            _ => None,
        }
    }

    pub fn logs(&self) -> &[TaskLog] {
        &self.logs
    }

    /// Whole seconds since the current task started.
    pub fn elapsed_seconds(&self) -> u32 {
        let Some(started) = self.task_started_ms else {
            return 0;
        };
        (now_ms().saturating_sub(started) / 1000).min(u32::MAX as u64) as u32
    }

    /// Estimate minus elapsed; negative once the task overruns.
    pub fn remaining_seconds(&self) -> i64 {
        let estimated = self
            .current_task()
            .map(|t| t.estimated_seconds)
            .unwrap_or(0);
        estimated as i64 - self.elapsed_seconds() as i64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let task = self.current_task();
        let remaining = self.remaining_seconds();
        Event::StateSnapshot {
            state: self.state,
            task_index: self.task_index,
            task_name: task.map(|t| t.name.clone()).unwrap_or_default(),
            estimated_seconds: task.map(|t| t.estimated_seconds).unwrap_or(0),
            elapsed_seconds: self.elapsed_seconds(),
            remaining_seconds: remaining,
            display: format_remaining(remaining),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the run at the first task. Only valid from `Idle`.
    ///
    /// Emits `RunStarted` followed by the first task's `TaskStarted`;
    /// empty when the transition is invalid.
    pub fn start(&mut self) -> Vec<Event> {
        if self.state != RunState::Idle || self.routine.tasks.is_empty() {
            return Vec::new();
        }
        self.state = RunState::Running;
        self.task_index = 0;
        self.task_started_ms = Some(now_ms());
        vec![
            Event::RunStarted {
                routine_id: self.routine.id.clone(),
                routine_name: self.routine.name.clone(),
                task_count: self.routine.tasks.len(),
                at: Utc::now(),
            },
            self.task_started(),
        ]
    }

    /// Record the current task's elapsed time and move on.
    ///
    /// Returns `TaskCompleted` plus the next task's `TaskStarted` while
    /// tasks remain, `RunFinished` alone after the last one. The caller
    /// feeds the accumulated logs to the estimate updater once the run
    /// is finished.
    pub fn advance(&mut self) -> Vec<Event> {
        if self.state != RunState::Running {
            return Vec::new();
        }
        let Some(task) = self.routine.tasks.get(self.task_index) else {
            return Vec::new();
        };
        let actual_seconds = self.elapsed_seconds();
        self.logs.push(TaskLog {
            task_id: task.id.clone(),
            actual_seconds,
        });
        let completed = Event::TaskCompleted {
            task_index: self.task_index,
            task_id: task.id.clone(),
            actual_seconds,
            at: Utc::now(),
        };

        if self.task_index + 1 < self.routine.tasks.len() {
            self.task_index += 1;
            self.task_started_ms = Some(now_ms());
            vec![completed, self.task_started()]
        } else {
            self.state = RunState::Finished;
            self.task_started_ms = None;
            vec![Event::RunFinished {
                routine_id: self.routine.id.clone(),
                task_count: self.logs.len(),
                at: Utc::now(),
            }]
        }
    }

    /// `TaskStarted` for the task the runner just entered.
    fn task_started(&self) -> Event {
        let task = &self.routine.tasks[self.task_index];
        Event::TaskStarted {
            task_index: self.task_index,
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            estimated_seconds: task.estimated_seconds,
            at: Utc::now(),
        }
    }

    /// Abandon the run, discarding the logs gathered so far.
    pub fn abandon(&mut self) -> Option<Event> {
        if self.state != RunState::Running {
            return None;
        }
        let completed_tasks = self.logs.len();
        self.state = RunState::Idle;
        self.task_index = 0;
        self.task_started_ms = None;
        self.logs.clear();
        Some(Event::RunAbandoned {
            routine_id: self.routine.id.clone(),
            completed_tasks,
            at: Utc::now(),
        })
    }

    #[cfg(test)]
    fn backdate_current_task(&mut self, secs: u64) {
        self.task_started_ms = self.task_started_ms.map(|ms| ms - secs * 1000);
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine() -> Routine {
        Routine::new(
            "Morning",
            vec![Task::new("Stretch", 300), Task::new("Shower", 600)],
        )
    }

    #[test]
    fn start_enters_running_at_first_task() {
        let mut runner = RoutineRunner::new(routine());
        assert_eq!(runner.state(), RunState::Idle);
        assert!(runner.current_task().is_none());

        let events = runner.start();
        assert_eq!(runner.state(), RunState::Running);
        assert_eq!(runner.task_index(), 0);
        assert!(matches!(events[0], Event::RunStarted { task_count: 2, .. }));
        assert!(matches!(events[1], Event::TaskStarted { task_index: 0, .. }));

        // Starting twice is a no-op.
        assert!(runner.start().is_empty());
    }

    #[test]
    fn advance_records_a_log_per_task_and_finishes() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();

        let first = runner.advance();
        assert!(matches!(first[0], Event::TaskCompleted { task_index: 0, .. }));
        assert_eq!(runner.state(), RunState::Running);
        assert_eq!(runner.task_index(), 1);
        assert_eq!(runner.logs().len(), 1);

        let last = runner.advance();
        assert_eq!(last.len(), 1);
        assert!(matches!(last[0], Event::RunFinished { task_count: 2, .. }));
        assert_eq!(runner.state(), RunState::Finished);
        assert_eq!(runner.logs().len(), 2);
        assert_eq!(runner.logs()[0].task_id, runner.routine().tasks[0].id);

        // Nothing left to advance.
        assert!(runner.advance().is_empty());
    }

    #[test]
    fn every_entered_task_announces_itself() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();

        let events = runner.advance();
        match &events[1] {
            Event::TaskStarted {
                task_index,
                task_name,
                estimated_seconds,
                ..
            } => {
                assert_eq!(*task_index, 1);
                assert_eq!(task_name, "Shower");
                assert_eq!(*estimated_seconds, 600);
            }
            other => panic!("expected TaskStarted, got {other:?}"),
        }

        // The final advance finishes the run with no next task to enter.
        let events = runner.advance();
        assert!(matches!(events[0], Event::RunFinished { .. }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::TaskStarted { .. })));
    }

    #[test]
    fn elapsed_is_wall_clock_and_uncapped() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();
        runner.backdate_current_task(360);

        assert!(runner.elapsed_seconds() >= 360);
        assert!(runner.remaining_seconds() <= -60);
        match runner.snapshot() {
            Event::StateSnapshot { display, .. } => assert!(display.starts_with("+ ")),
            _ => panic!("expected StateSnapshot"),
        }

        runner.advance();
        assert!(runner.logs()[0].actual_seconds >= 360);
    }

    #[test]
    fn countdown_display_before_overrun() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();
        match runner.snapshot() {
            Event::StateSnapshot {
                display,
                remaining_seconds,
                ..
            } => {
                assert!(remaining_seconds > 0);
                assert!(!display.starts_with('+'));
            }
            _ => panic!("expected StateSnapshot"),
        }
    }

    #[test]
    fn abandon_discards_logs() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();
        runner.advance();
        let event = runner.abandon().unwrap();
        assert!(matches!(
            event,
            Event::RunAbandoned {
                completed_tasks: 1,
                ..
            }
        ));
        assert_eq!(runner.state(), RunState::Idle);
        assert!(runner.logs().is_empty());
    }

    #[test]
    fn survives_a_serde_roundtrip_mid_run() {
        let mut runner = RoutineRunner::new(routine());
        runner.start();
        runner.advance();
        let json = serde_json::to_string(&runner).unwrap();
        let restored: RoutineRunner = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), RunState::Running);
        assert_eq!(restored.task_index(), 1);
        assert_eq!(restored.logs().len(), 1);
    }
}
