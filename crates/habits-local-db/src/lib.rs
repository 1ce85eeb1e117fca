//! SQLite database management for local habit state.
//!
//! The local database is the source of truth for every habit the app shows.
//! It owns a single `habits` table, applies its own schema migrations on open,
//! and exposes CRUD plus completion tracking through [`HabitStore`].

pub mod connection;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod streak;
pub mod update;

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {message}")]
    Migration { message: String },

    #[error("Habit {id} not found")]
    NotFound { id: HabitId },

    #[error("Invalid habit record: {message}")]
    InvalidRecord { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic database error: {0}")]
    Generic(String),
}

impl Error {
    /// Create a new migration error.
    pub fn migration<S: Into<String>>(message: S) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }

    /// Create a new invalid record error.
    pub fn invalid_record<S: Into<String>>(message: S) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create a new generic database error.
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the error is a schema constraint violation (empty title,
    /// unknown frequency, negative counter and the like).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Database connection and management.
pub use connection::Database;

/// Database models and operations.
pub use models::{Frequency, Habit, HabitId, HabitRecord, HabitStore, NewHabit, RemoteId, UserId};

/// Completion bookkeeping.
pub use streak::{next_streak, period_index, StreakState};

/// Sparse updates.
pub use update::HabitUpdate;

/// Schema definitions and constants.
pub use schema::*;
