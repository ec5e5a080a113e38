use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::TrackingEntry;
use crate::utils::date::offset_days;

/// Index a tracking log by date. When a date appears more than once the
/// later entry wins.
pub fn index_log(entries: &[TrackingEntry]) -> BTreeMap<NaiveDate, bool> {
    entries.iter().map(|e| (e.date, e.completed)).collect()
}

/// Consecutive completed days ending at `today`, or at yesterday when today
/// is not completed yet.
///
/// The walk moves backward one day at a time and stops at the first day
/// that is either missing or marked incomplete. Entries after `today` are
/// never reached. An explicit `completed: false` for today is treated the
/// same as no entry for today: the streak is whatever run ends yesterday.
pub fn current_streak(entries: &[TrackingEntry], today: NaiveDate) -> u32 {
    let log = index_log(entries);

    let mut cursor = if log.get(&today).copied().unwrap_or(false) {
        today
    } else {
        offset_days(today, -1)
    };

    let mut streak = 0u32;
    while log.get(&cursor).copied().unwrap_or(false) {
        streak += 1;
        let Some(prev) = cursor.pred_opt() else {
            break;
        };
        cursor = prev;
    }
    streak
}
