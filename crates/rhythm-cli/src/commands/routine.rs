//! Routine management commands.

use clap::Subcommand;
use rhythm_core::storage::{Config, Database};
use rhythm_core::{Routine, RoutineRepo, Task};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Create a new routine
    Add {
        /// Routine name
        name: String,
        /// Task as NAME, NAME:SECONDS or NAME:MM:SS (repeatable, in order)
        #[arg(long = "task", value_name = "NAME[:MM]:SS")]
        tasks: Vec<String>,
        /// Keep estimates fixed instead of adapting them after each run
        #[arg(long)]
        no_auto_update: bool,
        /// Opaque image blob (data URL) shown by the presentation layer
        #[arg(long)]
        image: Option<String>,
    },
    /// List routines
    List,
    /// Get routine details
    Show {
        /// Routine ID
        id: String,
    },
    /// Update a routine; --task arguments replace the whole task list
    Edit {
        /// Routine ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Replacement task as NAME, NAME:SECONDS or NAME:MM:SS (repeatable)
        #[arg(long = "task", value_name = "NAME[:MM]:SS")]
        tasks: Vec<String>,
        /// Adapt estimates after each run
        #[arg(long)]
        auto_update: Option<bool>,
        /// New image blob; empty string clears it
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a routine
    Delete {
        /// Routine ID
        id: String,
    },
}

/// Parse a `--task` spec. The trailing one or two `:`-separated fields
/// are numeric; anything before them is the task name.
fn parse_task_spec(spec: &str, default_seconds: u32) -> Result<(String, u32), String> {
    let parts: Vec<&str> = spec.split(':').collect();
    let err = || format!("invalid task spec '{spec}': expected NAME, NAME:SECONDS or NAME:MM:SS");

    let (name_parts, seconds) = match parts.as_slice() {
        [] => return Err(err()),
        [_] => (&parts[..], default_seconds),
        [head @ .., min, sec]
            if !head.is_empty() && min.parse::<u32>().is_ok() && sec.parse::<u32>().is_ok() =>
        {
            let min: u32 = min.parse().map_err(|_| err())?;
            let sec: u32 = sec.parse().map_err(|_| err())?;
            (head, min * 60 + sec)
        }
        [head @ .., sec] if sec.parse::<u32>().is_ok() => {
            let sec: u32 = sec.parse().map_err(|_| err())?;
            (head, sec)
        }
        _ => return Err(err()),
    };

    let name = name_parts.join(":").trim().to_string();
    if name.is_empty() {
        return Err(err());
    }
    Ok((name, seconds))
}

fn parse_tasks(specs: &[String], default_seconds: u32) -> Result<Vec<Task>, String> {
    specs
        .iter()
        .map(|spec| parse_task_spec(spec, default_seconds).map(|(name, secs)| Task::new(name, secs)))
        .collect()
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let repo = RoutineRepo::new(&db);

    match action {
        RoutineAction::Add {
            name,
            tasks,
            no_auto_update,
            image,
        } => {
            let config = Config::load()?;
            let mut routine = Routine::new(name, parse_tasks(&tasks, config.routine.default_task_seconds)?);
            routine.auto_update_estimates =
                !no_auto_update && config.routine.auto_update_estimates;
            routine.image = image;
            let routine = repo.upsert(routine)?;
            println!("Routine created: {}", routine.id);
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::List => {
            let routines = repo.list()?;
            println!("{}", serde_json::to_string_pretty(&routines)?);
        }
        RoutineAction::Show { id } => match repo.get(&id)? {
            Some(routine) => println!("{}", serde_json::to_string_pretty(&routine)?),
            None => println!("Routine not found: {id}"),
        },
        RoutineAction::Edit {
            id,
            name,
            tasks,
            auto_update,
            image,
        } => {
            let mut routine = repo.get(&id)?.ok_or(format!("Routine not found: {id}"))?;
            if let Some(n) = name {
                routine.name = n;
            }
            if !tasks.is_empty() {
                let config = Config::load()?;
                routine.tasks = parse_tasks(&tasks, config.routine.default_task_seconds)?;
            }
            if let Some(a) = auto_update {
                routine.auto_update_estimates = a;
            }
            if let Some(i) = image {
                routine.image = if i.is_empty() { None } else { Some(i) };
            }
            let routine = repo.upsert(routine)?;
            println!("Routine updated:");
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::Delete { id } => {
            if repo.delete(&id)? {
                println!("Routine deleted: {id}");
            } else {
                println!("Routine not found: {id}");
            }
        }
    }
    Ok(())
}
