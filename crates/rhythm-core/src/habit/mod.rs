//! Habit tracker: tap-to-increment daily counters over an append-only
//! event log, with calendar-day aggregation.

pub mod aggregate;
pub mod press;
pub mod repo;

pub use aggregate::{
    count_for_date, local_noon, shift_window, start_of_local_day, trend, TrendPoint,
    MILLIS_PER_DAY,
};
pub use press::{PressOutcome, PressTracker};
pub use repo::HabitRepo;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A counted habit. Field names stay camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitItem {
    pub id: String,
    pub name: String,
    /// Color token consumed by the presentation layer.
    pub color: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl HabitItem {
    pub fn new(name: impl Into<String>, color: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            created_at,
        }
    }
}

/// One increment of a habit counter. Append-only; several per item per
/// day represent repeated increments. References its item weakly by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEvent {
    pub item_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}
