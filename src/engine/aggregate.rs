use chrono::NaiveDate;

use crate::engine::completion::{completion_rate, DEFAULT_WINDOW_DAYS};
use crate::models::{Challenge, Habit, HabitStats, UserStats};

/// Cross-habit totals. Every habit weighs the same in the mean completion
/// rate regardless of age or frequency.
pub fn aggregate(habits: &[Habit], today: NaiveDate) -> HabitStats {
    if habits.is_empty() {
        return HabitStats::default();
    }

    let total_habits = habits.len();
    let active_streak = habits.iter().map(|h| h.current_streak).max().unwrap_or(0);
    let total_completions = habits.iter().map(Habit::total_completions).sum();
    let rate_sum: f64 = habits
        .iter()
        .map(|h| completion_rate(&h.tracking_data, today, DEFAULT_WINDOW_DAYS))
        .sum();

    HabitStats {
        total_habits,
        active_streak,
        completion_rate: rate_sum / total_habits as f64,
        total_completions,
    }
}

/// Habit totals plus the user's challenge participation.
pub fn user_stats(
    habits: &[Habit],
    challenges: &[Challenge],
    user_id: &str,
    today: NaiveDate,
) -> UserStats {
    let participations: Vec<_> = challenges
        .iter()
        .filter_map(|c| c.participant(user_id))
        .collect();

    UserStats {
        habits: aggregate(habits, today),
        challenges_joined: participations.len(),
        challenges_completed: participations.iter().filter(|p| p.is_complete()).count(),
    }
}
