//! Habit repository.
//!
//! Items and the event log live under two independent keys, each a
//! whole-collection JSON blob. Events reference items weakly by id;
//! deleting an item's events is an explicit separate step, not a
//! cascade.

use chrono::{NaiveDate, Utc};

use crate::error::{Result, StorageError};
use crate::storage::database::{Database, HABIT_ITEMS_KEY, HABIT_LOGS_KEY};

use super::aggregate::{count_for_date, local_noon, start_of_local_day, MILLIS_PER_DAY};
use super::{HabitEvent, HabitItem};

/// Habit items and event log over the key-value store.
pub struct HabitRepo<'a> {
    db: &'a Database,
}

impl<'a> HabitRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        let raw = self.db.kv_get(key)?;
        Ok(raw
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    // ── Items ────────────────────────────────────────────────────────

    pub fn items(&self) -> Result<Vec<HabitItem>, StorageError> {
        self.load(HABIT_ITEMS_KEY)
    }

    pub fn get_item(&self, id: &str) -> Result<Option<HabitItem>, StorageError> {
        Ok(self.items()?.into_iter().find(|i| i.id == id))
    }

    pub fn save_items(&self, items: &[HabitItem]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.db.kv_set(HABIT_ITEMS_KEY, &json)?;
        Ok(())
    }

    pub fn add_item(&self, name: &str, color: &str) -> Result<HabitItem> {
        let item = HabitItem::new(name, color, Utc::now().timestamp_millis());
        let mut items = self.items()?;
        items.push(item.clone());
        self.save_items(&items)?;
        Ok(item)
    }

    /// Remove an item. The item's events stay in the log until
    /// [`delete_events_for`](Self::delete_events_for) is called.
    pub fn delete_item(&self, id: &str) -> Result<bool> {
        let items = self.items()?;
        let before = items.len();
        let remaining: Vec<HabitItem> = items.into_iter().filter(|i| i.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.save_items(&remaining)?;
        Ok(true)
    }

    // ── Event log ────────────────────────────────────────────────────

    pub fn events(&self) -> Result<Vec<HabitEvent>, StorageError> {
        self.load(HABIT_LOGS_KEY)
    }

    pub fn save_events(&self, events: &[HabitEvent]) -> Result<()> {
        let json = serde_json::to_string(events)?;
        self.db.kv_set(HABIT_LOGS_KEY, &json)?;
        Ok(())
    }

    /// Append one increment for `item_id` stamped now.
    pub fn tap(&self, item_id: &str) -> Result<HabitEvent> {
        let event = HabitEvent {
            item_id: item_id.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let mut events = self.events()?;
        events.push(event.clone());
        self.save_events(&events)?;
        Ok(event)
    }

    /// Drop every event referencing `item_id`. Returns how many were
    /// removed.
    pub fn delete_events_for(&self, item_id: &str) -> Result<usize> {
        let events = self.events()?;
        let before = events.len();
        let remaining: Vec<HabitEvent> =
            events.into_iter().filter(|e| e.item_id != item_id).collect();
        let removed = before - remaining.len();
        if removed > 0 {
            self.save_events(&remaining)?;
        }
        Ok(removed)
    }

    /// Reconcile the log so `item_id` has exactly `target` events on the
    /// local calendar day `date`.
    ///
    /// Increasing appends the missing increments at local noon and keeps
    /// the existing events. Decreasing removes all of the day's events
    /// for the item and refills with `target` noon-stamped ones -- the
    /// original per-event timestamps are not preserved on a decrease.
    pub fn set_count_for_date(&self, item_id: &str, date: NaiveDate, target: usize) -> Result<()> {
        let mut events = self.events()?;
        let current = count_for_date(&events, item_id, date);
        if current == target {
            return Ok(());
        }

        let noon = local_noon(date);
        if target > current {
            for _ in current..target {
                events.push(HabitEvent {
                    item_id: item_id.to_string(),
                    timestamp: noon,
                });
            }
        } else {
            let start = start_of_local_day(date);
            let end = start + MILLIS_PER_DAY;
            events.retain(|e| {
                !(e.item_id == item_id && e.timestamp >= start && e.timestamp < end)
            });
            for _ in 0..target {
                events.push(HabitEvent {
                    item_id: item_id.to_string(),
                    timestamp: noon,
                });
            }
        }
        self.save_events(&events)?;
        Ok(())
    }
}
