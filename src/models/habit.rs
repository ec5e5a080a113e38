use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::engine::streak::index_log;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl HabitFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitFrequency::Daily => "daily",
            HabitFrequency::Weekly => "weekly",
            HabitFrequency::Custom => "custom",
        }
    }
}

impl FromStr for HabitFrequency {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(HabitFrequency::Daily),
            "weekly" => Ok(HabitFrequency::Weekly),
            "custom" => Ok(HabitFrequency::Custom),
            _ => Err(anyhow::anyhow!("Unknown habit frequency: {}", s)),
        }
    }
}

/// One day in a habit's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub date: NaiveDate,
    pub completed: bool,
}

impl TrackingEntry {
    pub fn new(date: NaiveDate, completed: bool) -> Self {
        Self { date, completed }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub frequency: HabitFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    /// Weekday indices, 0 = Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_days: Option<BTreeSet<u8>>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tracking_data: Vec<TrackingEntry>,
    /// Goal this habit serves. Goals are not tracked here; the id is kept
    /// so records written by other clients round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    /// Owner, see `HabitRepo::get_by_user`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Habit {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        frequency: HabitFrequency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            icon: None,
            color: None,
            frequency,
            time_of_day: None,
            reminder_time: None,
            custom_days: None,
            current_streak: 0,
            longest_streak: 0,
            created_at,
            tracking_data: Vec::new(),
            goal_id: None,
            user_id: None,
        }
    }

    /// Completion flag recorded for `date`, if any. Later entries win over
    /// earlier duplicates.
    pub fn entry_for(&self, date: NaiveDate) -> Option<bool> {
        self.tracking_data
            .iter()
            .rev()
            .find(|e| e.date == date)
            .map(|e| e.completed)
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.entry_for(date).unwrap_or(false)
    }

    /// Completed days, counting each date once with the last entry winning.
    pub fn total_completions(&self) -> usize {
        index_log(&self.tracking_data)
            .values()
            .filter(|completed| **completed)
            .count()
    }

    /// Whether the habit is scheduled on `date` according to its frequency.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        match self.frequency {
            HabitFrequency::Daily => true,
            HabitFrequency::Weekly => {
                self.created_at.date_naive().weekday().num_days_from_sunday() as u8 == weekday
            }
            HabitFrequency::Custom => self
                .custom_days
                .as_ref()
                .is_some_and(|days| days.contains(&weekday)),
        }
    }
}

/// Fields a caller provides when creating a habit. Identity, timestamps and
/// streaks are filled in by [`NewHabit::into_habit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub custom_days: Option<BTreeSet<u8>>,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NewHabit {
    pub fn into_habit(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Habit {
        let custom_days = self
            .custom_days
            .map(|days| days.into_iter().filter(|d| *d <= 6).collect());
        Habit {
            description: self.description,
            icon: self.icon,
            color: self.color,
            time_of_day: self.time_of_day,
            reminder_time: self.reminder_time,
            custom_days,
            goal_id: self.goal_id,
            user_id: self.user_id,
            ..Habit::new(id, self.name, self.frequency, created_at)
        }
    }
}
