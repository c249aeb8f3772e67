//! Adaptive estimate updates.
//!
//! After a run, each task's estimate moves toward the measured duration
//! by a weighted average: 70% history, 30% most recent run. Routines
//! with auto-update switched off still get a report, but estimates stay
//! put.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::repo::RoutineRepo;
use super::{Routine, TaskLog};

/// Weight given to the existing estimate.
pub const HISTORY_WEIGHT: f64 = 0.7;
/// Weight given to the measured duration.
pub const RECENT_WEIGHT: f64 = 0.3;

/// One task's before/after line in a run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub task_name: String,
    pub old_est: u32,
    pub new_est: u32,
    pub actual: u32,
}

/// Result of feeding a run's logs through the updater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateReport {
    pub updates: Vec<TaskUpdate>,
    pub routine: Routine,
}

/// Blend an existing estimate with a measured duration.
///
/// Half-away-from-zero rounding; inputs are non-negative, so ties
/// round up.
pub fn blend(old_est: u32, actual: u32) -> u32 {
    (old_est as f64 * HISTORY_WEIGHT + actual as f64 * RECENT_WEIGHT).round() as u32
}

impl RoutineRepo<'_> {
    /// Re-estimate a routine's tasks from a run's measured durations.
    ///
    /// Logs whose task id no longer exists in the routine are silently
    /// skipped. Returns `None` when the routine id is unknown. The
    /// entire updated collection is persisted in a single write before
    /// returning; zero matching logs still persist (and report) the
    /// unmodified routine.
    pub fn update_estimates(
        &self,
        routine_id: &str,
        task_logs: &[TaskLog],
    ) -> Result<Option<EstimateReport>> {
        let mut routines = self.list()?;
        let Some(routine) = routines.iter_mut().find(|r| r.id == routine_id) else {
            return Ok(None);
        };

        let mut updates = Vec::new();
        for log in task_logs {
            let Some(task) = routine.tasks.iter_mut().find(|t| t.id == log.task_id) else {
                continue;
            };
            let old_est = task.estimated_seconds;
            let new_est = if routine.auto_update_estimates {
                blend(old_est, log.actual_seconds)
            } else {
                old_est
            };
            task.estimated_seconds = new_est;
            updates.push(TaskUpdate {
                task_name: task.name.clone(),
                old_est,
                new_est,
                actual: log.actual_seconds,
            });
        }

        let report = EstimateReport {
            updates,
            routine: routine.clone(),
        };
        self.save_all(&routines)?;
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::Task;
    use crate::storage::Database;
    use proptest::prelude::*;

    #[test]
    fn blend_matches_the_weighted_average() {
        // round(300*0.7 + 360*0.3) = round(210 + 108) = 318
        assert_eq!(blend(300, 360), 318);
        assert_eq!(blend(0, 0), 0);
        // Tie rounds up: 10*0.7 + 5*0.3 = 8.5
        assert_eq!(blend(10, 5), 9);
    }

    fn seed(db: &Database, auto_update: bool) -> Routine {
        let repo = RoutineRepo::new(db);
        let mut routine = Routine::new("Morning", vec![Task::new("Stretch", 300)]);
        routine.auto_update_estimates = auto_update;
        repo.upsert(routine).unwrap()
    }

    #[test]
    fn updates_and_persists_the_new_estimate() {
        let db = Database::open_memory().unwrap();
        let routine = seed(&db, true);
        let repo = RoutineRepo::new(&db);

        let logs = vec![TaskLog {
            task_id: routine.tasks[0].id.clone(),
            actual_seconds: 360,
        }];
        let report = repo.update_estimates(&routine.id, &logs).unwrap().unwrap();

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].old_est, 300);
        assert_eq!(report.updates[0].new_est, 318);
        assert_eq!(report.updates[0].actual, 360);
        assert_eq!(report.routine.tasks[0].estimated_seconds, 318);

        // The collection write happened before we returned.
        let reloaded = repo.get(&routine.id).unwrap().unwrap();
        assert_eq!(reloaded.tasks[0].estimated_seconds, 318);
    }

    #[test]
    fn auto_update_off_reports_but_keeps_old_estimate() {
        let db = Database::open_memory().unwrap();
        let routine = seed(&db, false);
        let repo = RoutineRepo::new(&db);

        let logs = vec![TaskLog {
            task_id: routine.tasks[0].id.clone(),
            actual_seconds: 360,
        }];
        let report = repo.update_estimates(&routine.id, &logs).unwrap().unwrap();
        assert_eq!(report.updates[0].new_est, 300);
        assert_eq!(
            repo.get(&routine.id).unwrap().unwrap().tasks[0].estimated_seconds,
            300
        );
    }

    #[test]
    fn unknown_task_ids_are_skipped() {
        let db = Database::open_memory().unwrap();
        let routine = seed(&db, true);
        let repo = RoutineRepo::new(&db);

        let logs = vec![
            TaskLog {
                task_id: "nope".to_string(),
                actual_seconds: 999,
            },
            TaskLog {
                task_id: routine.tasks[0].id.clone(),
                actual_seconds: 360,
            },
        ];
        let report = repo.update_estimates(&routine.id, &logs).unwrap().unwrap();
        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].task_name, "Stretch");
    }

    #[test]
    fn zero_matching_logs_is_not_an_error() {
        let db = Database::open_memory().unwrap();
        let routine = seed(&db, true);
        let repo = RoutineRepo::new(&db);

        let report = repo.update_estimates(&routine.id, &[]).unwrap().unwrap();
        assert!(report.updates.is_empty());
        assert_eq!(report.routine, routine);
    }

    #[test]
    fn unknown_routine_is_none() {
        let db = Database::open_memory().unwrap();
        seed(&db, true);
        let repo = RoutineRepo::new(&db);
        assert!(repo.update_estimates("missing", &[]).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn blend_stays_between_the_inputs(old in 0u32..1_000_000, actual in 0u32..1_000_000) {
            let blended = blend(old, actual);
            prop_assert!(blended >= old.min(actual));
            prop_assert!(blended <= old.max(actual));
        }

        #[test]
        fn blend_is_the_rounded_formula(old in 0u32..1_000_000, actual in 0u32..1_000_000) {
            let expected = (old as f64 * 0.7 + actual as f64 * 0.3).round() as u32;
            prop_assert_eq!(blend(old, actual), expected);
        }
    }
}
