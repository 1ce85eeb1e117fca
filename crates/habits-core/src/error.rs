//! Core error types for the habits data layer.

use habits_local_db::HabitId;

/// Core error type for all habit operations.
///
/// Remote mirror failures never show up here: the sync coordinator logs and
/// drops them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Persistence error: {0}")]
    Persistence(habits_local_db::Error),

    #[error("Habit {id} not found")]
    NotFound { id: HabitId },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<habits_local_db::Error> for Error {
    fn from(err: habits_local_db::Error) -> Self {
        match err {
            habits_local_db::Error::NotFound { id } => Self::NotFound { id },
            other => Self::Persistence(other),
        }
    }
}
