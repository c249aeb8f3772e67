//! End-to-end run flow: create a routine, run it to completion, and
//! check the estimate updater's persisted result.

use rhythm_core::storage::Database;
use rhythm_core::{Routine, RoutineRepo, RoutineRunner, RunState, Task, TaskLog};

fn open_db(dir: &tempfile::TempDir) -> Database {
    Database::open_at(&dir.path().join("rhythm.db")).unwrap()
}

#[test]
fn full_run_updates_estimates_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let repo = RoutineRepo::new(&db);

    let routine = repo
        .upsert(Routine::new(
            "Morning",
            vec![Task::new("Stretch", 300), Task::new("Shower", 600)],
        ))
        .unwrap();

    let mut runner = RoutineRunner::new(routine.clone());
    runner.start();
    runner.advance();
    runner.advance();
    assert_eq!(runner.state(), RunState::Finished);

    let report = repo
        .update_estimates(&routine.id, runner.logs())
        .unwrap()
        .unwrap();
    assert_eq!(report.updates.len(), 2);

    // Tasks advanced immediately, so each actual is ~0 and the new
    // estimate is 70% of the old one.
    let reloaded = repo.get(&routine.id).unwrap().unwrap();
    assert_eq!(reloaded.tasks[0].estimated_seconds, 210);
    assert_eq!(reloaded.tasks[1].estimated_seconds, 420);
}

#[test]
fn logs_survive_persistence_between_commands() {
    // The CLI saves the runner to the kv store after every command and
    // reloads it on the next; a mid-run process exit loses nothing.
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let repo = RoutineRepo::new(&db);
    let routine = repo
        .upsert(Routine::new(
            "Evening",
            vec![Task::new("Tidy", 120), Task::new("Read", 900)],
        ))
        .unwrap();

    let mut runner = RoutineRunner::new(routine);
    runner.start();
    runner.advance();
    db.kv_set("active_run", &serde_json::to_string(&runner).unwrap())
        .unwrap();

    let restored: RoutineRunner =
        serde_json::from_str(&db.kv_get("active_run").unwrap().unwrap()).unwrap();
    assert_eq!(restored.state(), RunState::Running);
    assert_eq!(restored.task_index(), 1);
    assert_eq!(restored.logs().len(), 1);
}

#[test]
fn stale_logs_for_edited_tasks_are_skipped() {
    // Editing a routine replaces its tasks (fresh ids); logs from a run
    // of the old version must not touch the new estimates.
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let repo = RoutineRepo::new(&db);
    let original = repo
        .upsert(Routine::new("Morning", vec![Task::new("Stretch", 300)]))
        .unwrap();

    let stale = vec![TaskLog {
        task_id: original.tasks[0].id.clone(),
        actual_seconds: 900,
    }];

    let mut edited = original.clone();
    edited.tasks = vec![Task::new("Stretch v2", 300)];
    repo.upsert(edited).unwrap();

    let report = repo.update_estimates(&original.id, &stale).unwrap().unwrap();
    assert!(report.updates.is_empty());
    let reloaded = repo.get(&original.id).unwrap().unwrap();
    assert_eq!(reloaded.tasks[0].estimated_seconds, 300);
}
