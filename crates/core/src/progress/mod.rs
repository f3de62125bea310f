//! Gamified library progress: persistent counters, recent-search history,
//! achievements, and the evolution stage derived from collection size.
//!
//! Counters live behind the [`ProgressStore`] key-value abstraction so the
//! rest of the system can be tested against an in-memory store while the
//! server persists to SQLite.

mod achievements;
mod evolution;
mod sqlite;
mod store;
mod tracker;

pub use achievements::{
    check_achievements, Achievement, AchievementCategory, UserProgress, ACHIEVEMENTS,
};
pub use evolution::{EvolutionStage, EVOLUTION_STAGES};
pub use sqlite::SqliteProgressStore;
pub use store::{keys, MemoryProgressStore, ProgressError, ProgressStore};
pub use tracker::{
    EvolutionTransition, LibraryStats, ProgressCounters, ProgressReport, ProgressTracker,
    RecentSearch,
};
