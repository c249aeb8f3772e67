//! Run a routine's timed checklist.
//!
//! The runner is persisted in the key-value store between invocations,
//! so `status` can be polled for the countdown (the original UI's
//! 1-second refresh) and an interrupted shell session loses nothing.

use clap::Subcommand;
use rhythm_core::storage::database::ACTIVE_RUN_KEY;
use rhythm_core::storage::Database;
use rhythm_core::timefmt::format_mm_ss;
use rhythm_core::{EstimateReport, RoutineRepo, RoutineRunner, RunState};

use crate::chart::{self, Series};

#[derive(Subcommand)]
pub enum RunAction {
    /// Start running a routine
    Start {
        /// Routine ID
        routine_id: String,
    },
    /// Print the current task countdown as JSON
    Status,
    /// Finish the current task and move to the next
    Next,
    /// Abandon the run, discarding its logs
    Abandon,
}

fn load_runner(db: &Database) -> Result<Option<RoutineRunner>, Box<dyn std::error::Error>> {
    match db.kv_get(ACTIVE_RUN_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

fn save_runner(db: &Database, runner: &RoutineRunner) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(runner)?;
    db.kv_set(ACTIVE_RUN_KEY, &json)?;
    Ok(())
}

/// Mirror of the original result screen: per-task actuals plus an
/// Est/Act bar chart.
fn print_report(report: &EstimateReport) {
    for update in &report.updates {
        println!(
            "{}\n  Act: {}\n  Est: {} -> {}",
            update.task_name,
            format_mm_ss(update.actual),
            format_mm_ss(update.old_est),
            format_mm_ss(update.new_est),
        );
    }
    let labels: Vec<String> = report.updates.iter().map(|u| u.task_name.clone()).collect();
    let series = [
        Series {
            name: "Est",
            data: report.updates.iter().map(|u| u.old_est as u64).collect(),
        },
        Series {
            name: "Act",
            data: report.updates.iter().map(|u| u.actual as u64).collect(),
        },
    ];
    print!("{}", chart::render("Run Result", &labels, &series));
}

pub fn run(action: RunAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        RunAction::Start { routine_id } => {
            if let Some(runner) = load_runner(&db)? {
                if runner.state() == RunState::Running {
                    return Err(format!(
                        "a run of '{}' is already in progress; `rhythm run abandon` first",
                        runner.routine().name
                    )
                    .into());
                }
            }
            let repo = RoutineRepo::new(&db);
            let routine = repo
                .get(&routine_id)?
                .ok_or(format!("Routine not found: {routine_id}"))?;
            let mut runner = RoutineRunner::new(routine);
            let events = runner.start();
            if events.is_empty() {
                return Err("routine has no tasks to run".into());
            }
            save_runner(&db, &runner)?;
            for event in &events {
                println!("{}", serde_json::to_string_pretty(event)?);
            }
            println!("{}", serde_json::to_string_pretty(&runner.snapshot())?);
        }
        RunAction::Status => match load_runner(&db)? {
            Some(runner) => println!("{}", serde_json::to_string_pretty(&runner.snapshot())?),
            None => println!("No active run"),
        },
        RunAction::Next => {
            let Some(mut runner) = load_runner(&db)? else {
                println!("No active run");
                return Ok(());
            };
            let events = runner.advance();
            if events.is_empty() {
                println!("No active run");
                return Ok(());
            }
            for event in &events {
                println!("{}", serde_json::to_string_pretty(event)?);
            }

            if runner.state() == RunState::Finished {
                let repo = RoutineRepo::new(&db);
                match repo.update_estimates(&runner.routine().id, runner.logs())? {
                    Some(report) => print_report(&report),
                    // Deleted mid-run; the logs have nowhere to go.
                    None => println!("Routine no longer exists; run logs discarded"),
                }
                db.kv_delete(ACTIVE_RUN_KEY)?;
            } else {
                save_runner(&db, &runner)?;
                println!("{}", serde_json::to_string_pretty(&runner.snapshot())?);
            }
        }
        RunAction::Abandon => {
            let Some(mut runner) = load_runner(&db)? else {
                println!("No active run");
                return Ok(());
            };
            match runner.abandon() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("No active run"),
            }
            db.kv_delete(ACTIVE_RUN_KEY)?;
        }
    }
    Ok(())
}
