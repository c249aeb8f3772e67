//! Calendar-day aggregation over the habit event log.
//!
//! Day boundaries use the local calendar day, not UTC: callers pass
//! wall-clock dates. A day's window is `[startOfLocalDay, start +
//! 86_400_000)` exactly, matching the original arithmetic even across
//! DST changes.

use chrono::{Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::HabitEvent;

/// Milliseconds in the fixed day window.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// One day's count in a trend window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

fn local_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    let ndt = NaiveDateTime::new(date, time);
    match Local.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        // A spring-forward gap; the hour after it exists.
        LocalResult::None => Local
            .from_local_datetime(&(ndt + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_default(),
    }
}

/// Epoch milliseconds at local midnight of `date`.
pub fn start_of_local_day(date: NaiveDate) -> i64 {
    local_millis(date, NaiveTime::MIN)
}

/// Epoch milliseconds at local noon of `date`. Synthetic events created
/// by count reconciliation are stamped here.
pub fn local_noon(date: NaiveDate) -> i64 {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    local_millis(date, noon)
}

/// Count `item_id`'s events falling on the local calendar day `date`.
pub fn count_for_date(events: &[HabitEvent], item_id: &str, date: NaiveDate) -> usize {
    let start = start_of_local_day(date);
    let end = start + MILLIS_PER_DAY;
    events
        .iter()
        .filter(|e| e.item_id == item_id && e.timestamp >= start && e.timestamp < end)
        .count()
}

/// Per-day counts for `end_date - (window_days - 1) ..= end_date`,
/// ascending.
pub fn trend(
    events: &[HabitEvent],
    item_id: &str,
    end_date: NaiveDate,
    window_days: u32,
) -> Vec<TrendPoint> {
    (0..window_days)
        .map(|i| {
            let date = end_date - Duration::days((window_days - 1 - i) as i64);
            TrendPoint {
                date,
                count: count_for_date(events, item_id, date),
            }
        })
        .collect()
}

/// Shift a trend window's end date by whole windows. Navigation jumps a
/// full window at a time, so consecutive pages tile without overlap.
pub fn shift_window(end_date: NaiveDate, pages: i64, window_days: u32) -> NaiveDate {
    end_date + Duration::days(pages * window_days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(item_id: &str, timestamp: i64) -> HabitEvent {
        HabitEvent {
            item_id: item_id.to_string(),
            timestamp,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_only_the_item_and_the_day() {
        let d = day(2024, 3, 10);
        let start = start_of_local_day(d);
        let events = vec![
            event("a", start),
            event("a", start + 5_000),
            event("a", start + MILLIS_PER_DAY - 1),
            event("a", start + MILLIS_PER_DAY), // next day
            event("a", start - 1),              // previous day
            event("b", start + 5_000),          // other item
        ];
        assert_eq!(count_for_date(&events, "a", d), 3);
        assert_eq!(count_for_date(&events, "b", d), 1);
        assert_eq!(count_for_date(&events, "c", d), 0);
    }

    #[test]
    fn count_is_idempotent_without_log_mutation() {
        let d = day(2024, 3, 10);
        let events = vec![event("a", start_of_local_day(d) + 10)];
        let first = count_for_date(&events, "a", d);
        assert_eq!(count_for_date(&events, "a", d), first);
    }

    #[test]
    fn trend_covers_the_window_ascending() {
        let end = day(2024, 3, 10);
        let events = vec![
            event("a", start_of_local_day(day(2024, 3, 4)) + 1),
            event("a", start_of_local_day(end) + 1),
            event("a", start_of_local_day(end) + 2),
        ];
        let points = trend(&events, "a", end, 7);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, day(2024, 3, 4));
        assert_eq!(points[6].date, end);
        for pair in points.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert_eq!(points[0].count, 1);
        assert_eq!(points[6].count, 2);
        assert_eq!(points[3].count, 0);
    }

    #[test]
    fn windows_tile_without_overlap() {
        let end = day(2024, 3, 10);
        let prev = shift_window(end, -1, 7);
        assert_eq!(prev, day(2024, 3, 3));
        // The previous window ends the day before this window begins.
        let this_window_start = end - Duration::days(6);
        assert_eq!(prev + Duration::days(1), this_window_start);
        assert_eq!(shift_window(prev, 1, 7), end);
    }

    #[test]
    fn noon_is_inside_the_day_window() {
        let d = day(2024, 6, 1);
        let noon = local_noon(d);
        let start = start_of_local_day(d);
        assert!(noon >= start && noon < start + MILLIS_PER_DAY);
    }
}
