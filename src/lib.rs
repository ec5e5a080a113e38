//! Habit tracking core: streak and completion-rate computation over sparse
//! per-day logs, challenge progress, and key/value persistence adapters.

pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

pub use error::{Result, TrackerError};
