pub mod category;
pub mod challenge;
pub mod habit;
pub mod stats;
pub mod suggestion;

pub use category::Category;
pub use challenge::{Challenge, ChallengeParticipant, NewChallenge};
pub use habit::{Habit, HabitFrequency, NewHabit, TrackingEntry};
pub use stats::{DayStatus, HabitStats, UserStats};
pub use suggestion::{suggestions_for, suggestions_for_goals, Suggestion};
