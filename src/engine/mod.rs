//! Pure streak, completion and progress computations. Nothing here reads
//! the clock or touches storage; callers pass `today` explicitly.

pub mod aggregate;
pub mod completion;
pub mod progress;
pub mod streak;
pub mod toggle;

pub use aggregate::{aggregate, user_stats};
pub use completion::{completion_rate, last_n_days_status, DEFAULT_WINDOW_DAYS};
pub use progress::{
    join, leave, progress_percent, total_days_inclusive, update_progress, with_participant,
};
pub use streak::current_streak;
pub use toggle::{refresh_streaks, toggle_completion};
