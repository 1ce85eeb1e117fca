//! Sparse habit updates.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;

use crate::models::{format_timestamp, Frequency, RemoteId};
use crate::schema::habits;

/// A patch over the updatable habit columns.
///
/// Only the fields set on the builder are written. `id`, `user_id` and
/// `created_at` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitUpdate {
    title: Option<String>,
    description: Option<String>,
    frequency: Option<Frequency>,
    streak_count: Option<u32>,
    best_streak: Option<u32>,
    total_count: Option<u32>,
    last_completed: Option<DateTime<Utc>>,
    remote_id: Option<Option<RemoteId>>,
}

impl HabitUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn streak_count(mut self, streak_count: u32) -> Self {
        self.streak_count = Some(streak_count);
        self
    }

    pub fn best_streak(mut self, best_streak: u32) -> Self {
        self.best_streak = Some(best_streak);
        self
    }

    pub fn total_count(mut self, total_count: u32) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn last_completed(mut self, at: DateTime<Utc>) -> Self {
        self.last_completed = Some(at);
        self
    }

    pub fn remote_id(mut self, remote_id: RemoteId) -> Self {
        self.remote_id = Some(Some(remote_id));
        self
    }

    /// Mark the habit as no longer mirrored.
    pub fn clear_remote_id(mut self) -> Self {
        self.remote_id = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column/value pairs to write, in a fixed column order.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut out = Vec::new();
        if let Some(title) = &self.title {
            out.push((habits::TITLE, Value::Text(title.clone())));
        }
        if let Some(description) = &self.description {
            out.push((habits::DESCRIPTION, Value::Text(description.clone())));
        }
        if let Some(frequency) = self.frequency {
            out.push((habits::FREQUENCY, Value::Text(frequency.as_str().to_string())));
        }
        if let Some(streak_count) = self.streak_count {
            out.push((habits::STREAK_COUNT, Value::Integer(i64::from(streak_count))));
        }
        if let Some(best_streak) = self.best_streak {
            out.push((habits::BEST_STREAK, Value::Integer(i64::from(best_streak))));
        }
        if let Some(total_count) = self.total_count {
            out.push((habits::TOTAL_COUNT, Value::Integer(i64::from(total_count))));
        }
        if let Some(at) = &self.last_completed {
            out.push((habits::LAST_COMPLETED, Value::Text(format_timestamp(at))));
        }
        if let Some(remote_id) = &self.remote_id {
            let value = match remote_id {
                Some(id) => Value::Text(id.as_str().to_string()),
                None => Value::Null,
            };
            out.push((habits::REMOTE_ID, value));
        }
        out
    }
}
