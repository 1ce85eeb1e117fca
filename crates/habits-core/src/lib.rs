//! Habits core: local-first writes and read-side queries.
//!
//! [`SyncCoordinator`] owns the write path. The local database decides the
//! outcome of every write; the optional remote mirror is called first on
//! create and after the local change on delete, and its failures are only
//! logged. [`HabitQueries`] serves lists, rankings and streak summaries.

pub mod document;
pub mod error;
pub mod query;
pub mod sync;

pub use error::Error;
pub use query::{HabitQueries, HabitStats, StreakSummary, DEFAULT_TOP_STREAKS};
pub use sync::{
    BulkDeleteReport, CreatedHabit, SyncConfig, SyncCoordinator, DEFAULT_REMOTE_TIMEOUT,
};

pub use habits_local_db::{
    Database, Frequency, Habit, HabitId, HabitUpdate, NewHabit, RemoteId, UserId,
};

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
