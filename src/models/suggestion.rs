use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::HabitFrequency::{Daily, Weekly};
use crate::models::{Category, Habit, HabitFrequency};

/// A ready-made habit offered for a goal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub name: &'static str,
    pub icon: &'static str,
    pub frequency: HabitFrequency,
    pub description: &'static str,
}

impl Suggestion {
    const fn new(
        name: &'static str,
        icon: &'static str,
        frequency: HabitFrequency,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            icon,
            frequency,
            description,
        }
    }

    pub fn to_habit(&self, id: impl Into<String>, created_at: DateTime<Utc>) -> Habit {
        let mut habit = Habit::new(id, self.name, self.frequency, created_at);
        habit.icon = Some(self.icon.to_string());
        habit.description = Some(self.description.to_string());
        habit
    }
}

const HEALTH: [Suggestion; 3] = [
    Suggestion::new("Drink 8 glasses of water", "💧", Daily, "Stay hydrated throughout the day"),
    Suggestion::new("Take vitamins", "💊", Daily, "Support your health with supplements"),
    Suggestion::new("Healthy meal prep", "🥗", Weekly, "Prepare healthy meals ahead of time"),
];

const FITNESS: [Suggestion; 3] = [
    Suggestion::new("30 minute workout", "💪", Daily, "Consistent exercise for better fitness"),
    Suggestion::new("10,000 steps", "🏃", Daily, "Stay active throughout the day"),
    Suggestion::new("Stretch routine", "🧘", Daily, "Improve flexibility and prevent injuries"),
];

const PRODUCTIVITY: [Suggestion; 3] = [
    Suggestion::new("Deep work session", "🎯", Daily, "Focused work without distractions"),
    Suggestion::new("Email zero inbox", "📧", Daily, "Process all emails to keep inbox clean"),
    Suggestion::new("Weekly planning", "📝", Weekly, "Plan your week in advance"),
];

const LEARNING: [Suggestion; 3] = [
    Suggestion::new("Read 20 pages", "📚", Daily, "Build knowledge through consistent reading"),
    Suggestion::new("Learn a language", "🗣", Daily, "Practice for at least 15 minutes"),
    Suggestion::new("Take an online course", "💻", Weekly, "Invest in your skills development"),
];

const MINDFULNESS: [Suggestion; 3] = [
    Suggestion::new("Morning meditation", "🧘", Daily, "Start your day with mindfulness"),
    Suggestion::new("Gratitude journal", "✍", Daily, "Write three things you're grateful for"),
    Suggestion::new("Digital detox hour", "📵", Daily, "Take a break from screens"),
];

const SOCIAL: [Suggestion; 3] = [
    Suggestion::new("Call a friend", "📞", Weekly, "Stay connected with loved ones"),
    Suggestion::new("Networking", "🤝", Weekly, "Reach out to one professional contact"),
    Suggestion::new("Family dinner", "👪", Weekly, "Quality time with family"),
];

const OTHER: [Suggestion; 3] = [
    Suggestion::new("Hobby time", "🎨", Weekly, "Make time for activities you enjoy"),
    Suggestion::new("Declutter one area", "🧹", Weekly, "Maintain a clean living space"),
    Suggestion::new("Personal finance check", "💰", Weekly, "Review your budget and spending"),
];

const GENERAL: [Suggestion; 3] = [
    Suggestion::new("Morning routine", "🌅", Daily, "Start your day with intention"),
    Suggestion::new("Evening reflection", "🌙", Daily, "Review your day before sleep"),
    Suggestion::new("Weekly planning", "📝", Weekly, "Plan your week for better productivity"),
];

/// Habits to suggest to someone working toward a goal in `category`.
pub fn suggestions_for(category: Category) -> &'static [Suggestion] {
    match category {
        Category::Health => &HEALTH,
        Category::Fitness => &FITNESS,
        Category::Productivity => &PRODUCTIVITY,
        Category::Learning => &LEARNING,
        Category::Mindfulness => &MINDFULNESS,
        Category::Social => &SOCIAL,
        Category::Other => &OTHER,
    }
}

/// Up to two suggestions per distinct goal category, in the order the
/// categories first appear. Falls back to general habits when there are no
/// goals.
pub fn suggestions_for_goals(categories: &[Category]) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for category in categories {
        if seen.insert(*category) {
            result.extend(suggestions_for(*category).iter().take(2).copied());
        }
    }
    if result.is_empty() {
        result.extend(GENERAL.iter().copied());
    }
    result
}
