//! Habit counter commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use rhythm_core::habit::{count_for_date, shift_window, trend};
use rhythm_core::storage::{Config, Database};
use rhythm_core::{HabitRepo, PressOutcome, PressTracker};

use crate::chart::{self, Series};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit counter
    Add {
        /// Habit name
        name: String,
        /// Color token; defaults to the next palette entry
        #[arg(long)]
        color: Option<String>,
    },
    /// List habits with today's counts
    List,
    /// Delete a habit and its logged events
    Delete {
        /// Habit ID
        id: String,
    },
    /// Record one increment for today
    Tap {
        /// Habit ID
        id: String,
    },
    /// Classify a press of a given duration: a short press increments,
    /// a long press emits the item payload for editing
    Press {
        /// Habit ID
        id: String,
        /// How long the press was held, in milliseconds
        #[arg(long)]
        held_ms: u64,
    },
    /// Set the exact count for a day
    Set {
        /// Habit ID
        id: String,
        /// Target count
        count: usize,
        /// Day to reconcile (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show a trend window of daily counts
    Trend {
        /// Habit ID
        id: String,
        /// Window end date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Window size in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
        /// Page backwards (negative) or forwards by whole windows
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        page: i64,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let repo = HabitRepo::new(&db);

    match action {
        HabitAction::Add { name, color } => {
            let color = match color {
                Some(c) => c,
                None => {
                    let config = Config::load()?;
                    let palette = &config.habit.palette;
                    let taken = repo.items()?.len();
                    palette
                        .get(taken % palette.len().max(1))
                        .cloned()
                        .unwrap_or_default()
                }
            };
            let item = repo.add_item(&name, &color)?;
            println!("Habit created: {}", item.id);
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        HabitAction::List => {
            let items = repo.items()?;
            let events = repo.events()?;
            let rows: Vec<serde_json::Value> = items
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "id": item.id,
                        "name": item.name,
                        "color": item.color,
                        "createdAt": item.created_at,
                        "today": count_for_date(&events, &item.id, today()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        HabitAction::Delete { id } => {
            if !repo.delete_item(&id)? {
                println!("Habit not found: {id}");
                return Ok(());
            }
            // Events don't cascade; drop them explicitly.
            let removed = repo.delete_events_for(&id)?;
            println!("Habit deleted: {id} ({removed} events removed)");
        }
        HabitAction::Tap { id } => {
            tap(&repo, &id)?;
        }
        HabitAction::Press { id, held_ms } => {
            let config = Config::load()?;
            match PressTracker::classify(config.habit.long_press_ms, held_ms) {
                PressOutcome::Tap => tap(&repo, &id)?,
                PressOutcome::Hold => match repo.get_item(&id)? {
                    Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                    None => println!("Habit not found: {id}"),
                },
            }
        }
        HabitAction::Set { id, count, date } => {
            if repo.get_item(&id)?.is_none() {
                println!("Habit not found: {id}");
                return Ok(());
            }
            let date = date.unwrap_or_else(today);
            repo.set_count_for_date(&id, date, count)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "itemId": id,
                    "date": date,
                    "count": count,
                }))?
            );
        }
        HabitAction::Trend {
            id,
            date,
            days,
            page,
        } => {
            let Some(item) = repo.get_item(&id)? else {
                println!("Habit not found: {id}");
                return Ok(());
            };
            let config = Config::load()?;
            let window_days = days.unwrap_or(config.habit.trend_window_days).max(1);
            let end = shift_window(date.unwrap_or_else(today), page, window_days);
            let events = repo.events()?;
            let points = trend(&events, &id, end, window_days);

            let labels: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
            let series = [Series {
                name: "count",
                data: points.iter().map(|p| p.count as u64).collect(),
            }];
            print!(
                "{}",
                chart::render(&format!("{} ({} days)", item.name, window_days), &labels, &series)
            );
        }
    }
    Ok(())
}

fn tap(repo: &HabitRepo, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    if repo.get_item(id)?.is_none() {
        println!("Habit not found: {id}");
        return Ok(());
    }
    repo.tap(id)?;
    let events = repo.events()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "itemId": id,
            "today": count_for_date(&events, id, today()),
        }))?
    );
    Ok(())
}
