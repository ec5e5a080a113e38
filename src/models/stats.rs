use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate figures over a habit collection. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub total_habits: usize,
    /// Best current streak across habits
    pub active_streak: u32,
    /// Mean of per-habit 30-day completion rates, 0-100
    pub completion_rate: f64,
    pub total_completions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(flatten)]
    pub habits: HabitStats,
    pub challenges_joined: usize,
    pub challenges_completed: usize,
}

/// One cell of a last-N-days grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub date: NaiveDate,
    pub completed: bool,
    pub is_today: bool,
}
