pub mod migrations;
pub mod repository;
pub mod store;

pub use repository::{ChallengeRepo, HabitRepo};
pub use store::{FileStore, MemoryStore, SqliteStore, Store};
