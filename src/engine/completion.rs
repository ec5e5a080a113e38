use chrono::NaiveDate;

use crate::engine::streak::index_log;
use crate::models::{DayStatus, TrackingEntry};
use crate::utils::date::{checked_offset_days, last_n_days};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Status of each of the last `days` days ending at `today`, oldest first.
/// Days without an entry count as not completed.
pub fn last_n_days_status(entries: &[TrackingEntry], today: NaiveDate, days: u32) -> Vec<DayStatus> {
    let log = index_log(entries);
    last_n_days(today, days)
        .into_iter()
        .map(|date| DayStatus {
            date,
            completed: log.get(&date).copied().unwrap_or(false),
            is_today: date == today,
        })
        .collect()
}

/// Percentage of completed days in the trailing window ending at `today`.
///
/// Always divides by the full window size, so a habit younger than the
/// window scores lower until it has accumulated history.
pub fn completion_rate(entries: &[TrackingEntry], today: NaiveDate, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let start =
        checked_offset_days(today, -(i64::from(window_days) - 1)).unwrap_or(NaiveDate::MIN);
    let completed = index_log(entries)
        .range(start..=today)
        .filter(|(_, completed)| **completed)
        .count();
    completed as f64 / f64::from(window_days) * 100.0
}
