use chrono::NaiveDate;

use crate::engine::streak::{current_streak, index_log};
use crate::models::{Habit, TrackingEntry};

/// Flip the completion of `habit` on `date` and recompute its streaks.
///
/// A date with no entry becomes completed; an existing entry has its flag
/// inverted. The input is left untouched and a new record is returned with
/// a deduplicated, date-ordered log. `longest_streak` never decreases.
pub fn toggle_completion(habit: &Habit, date: NaiveDate, today: NaiveDate) -> Habit {
    let mut log = index_log(&habit.tracking_data);
    log.entry(date)
        .and_modify(|completed| *completed = !*completed)
        .or_insert(true);

    let tracking_data: Vec<TrackingEntry> = log
        .into_iter()
        .map(|(date, completed)| TrackingEntry::new(date, completed))
        .collect();

    let current = current_streak(&tracking_data, today);
    Habit {
        tracking_data,
        current_streak: current,
        longest_streak: current.max(habit.longest_streak),
        ..habit.clone()
    }
}

/// Recompute `current_streak` for `today`, keeping `longest_streak`
/// monotonic. Useful after a bulk update or when a stored streak has gone
/// stale because days passed.
pub fn refresh_streaks(habit: &Habit, today: NaiveDate) -> Habit {
    let current = current_streak(&habit.tracking_data, today);
    Habit {
        current_streak: current,
        longest_streak: current.max(habit.longest_streak),
        ..habit.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitFrequency;
    use crate::utils::date::{offset_days, parse_date};
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn empty_habit() -> Habit {
        Habit::new("h1", "Stretch", HabitFrequency::Daily, Utc::now())
    }

    #[test]
    fn test_first_toggle_marks_complete() {
        let today = d("2024-01-10");
        let habit = empty_habit();
        let updated = toggle_completion(&habit, today, today);
        assert_eq!(updated.tracking_data, vec![TrackingEntry::new(today, true)]);
        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 1);
        assert!(habit.tracking_data.is_empty(), "input must not be mutated");
    }

    #[test]
    fn test_double_toggle_leaves_incomplete_entry() {
        let today = d("2024-01-10");
        let once = toggle_completion(&empty_habit(), today, today);
        let twice = toggle_completion(&once, today, today);
        assert_eq!(twice.entry_for(today), Some(false));
        assert_eq!(twice.current_streak, 0);
        assert_eq!(twice.longest_streak, 1, "longest streak is monotonic");
    }

    #[test]
    fn test_toggle_past_day_fills_gap() {
        let today = d("2024-01-10");
        let mut habit = empty_habit();
        habit.tracking_data = vec![
            TrackingEntry::new(d("2024-01-10"), true),
            TrackingEntry::new(d("2024-01-08"), true),
        ];
        habit.current_streak = 1;
        habit.longest_streak = 1;

        let updated = toggle_completion(&habit, d("2024-01-09"), today);
        assert_eq!(updated.current_streak, 3);
        assert_eq!(updated.longest_streak, 3);
        assert_eq!(updated.tracking_data.len(), 3);
        assert_eq!(updated.tracking_data[0].date, d("2024-01-08"));
    }

    #[test]
    fn test_toggle_keeps_other_fields() {
        let today = d("2024-01-10");
        let mut habit = empty_habit();
        habit.description = Some("ten minutes".into());
        habit.longest_streak = 12;
        let updated = toggle_completion(&habit, today, today);
        assert_eq!(updated.id, habit.id);
        assert_eq!(updated.description, habit.description);
        assert_eq!(updated.created_at, habit.created_at);
        assert_eq!(updated.longest_streak, 12);
    }

    #[test]
    fn test_toggle_normalizes_duplicates() {
        let today = d("2024-01-10");
        let mut habit = empty_habit();
        habit.tracking_data = vec![
            TrackingEntry::new(today, true),
            TrackingEntry::new(today, false),
        ];
        // last write (false) wins, so the toggle flips it to true
        let updated = toggle_completion(&habit, today, today);
        assert_eq!(updated.tracking_data, vec![TrackingEntry::new(today, true)]);
    }

    #[test]
    fn test_longest_never_below_current_over_many_toggles() {
        let today = d("2024-02-01");
        let mut habit = empty_habit();
        // deterministic walk over the last two weeks
        for step in 0..60i64 {
            let date = offset_days(today, -((step * 5) % 14));
            habit = toggle_completion(&habit, date, today);
            assert!(habit.longest_streak >= habit.current_streak);
        }
    }

    #[test]
    fn test_refresh_streaks_after_days_pass() {
        let mut habit = empty_habit();
        habit.tracking_data = vec![
            TrackingEntry::new(d("2024-01-09"), true),
            TrackingEntry::new(d("2024-01-10"), true),
        ];
        habit.current_streak = 2;
        habit.longest_streak = 2;

        let refreshed = refresh_streaks(&habit, d("2024-01-15"));
        assert_eq!(refreshed.current_streak, 0);
        assert_eq!(refreshed.longest_streak, 2);

        let mut stale = habit.clone();
        stale.longest_streak = 0;
        let refreshed = refresh_streaks(&stale, d("2024-01-11"));
        assert_eq!(refreshed.current_streak, 2);
        assert_eq!(refreshed.longest_streak, 2);
    }
}
