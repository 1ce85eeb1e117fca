//! Database models and persistence operations.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use rusqlite::{params, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::schema::{habits, TABLE_HABITS};
use crate::streak::next_streak;
use crate::update::HabitUpdate;

/// Store-assigned identifier of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub i64);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the owning account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the mirrored document in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a habit is meant to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(crate::Error::invalid_record(format!("Unknown frequency: {}", s))),
        }
    }
}

/// A stored habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub description: String,
    pub frequency: Frequency,
    pub streak_count: u32,
    pub best_streak: u32,
    pub total_count: u32,
    pub last_completed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub remote_id: Option<RemoteId>,
}

/// A habit that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub title: String,
    pub description: String,
    pub frequency: Frequency,
    pub streak_count: u32,
    pub best_streak: u32,
    pub total_count: u32,
    pub last_completed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub remote_id: Option<RemoteId>,
}

impl NewHabit {
    /// A fresh habit: zero counters, created and last completed now.
    pub fn new(title: impl Into<String>, frequency: Frequency, user_id: UserId) -> Self {
        let now = now_millis();
        Self {
            title: title.into(),
            description: String::new(),
            frequency,
            streak_count: 0,
            best_streak: 0,
            total_count: 0,
            last_completed: now,
            created_at: now,
            user_id,
            remote_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the creation instant (and the initial `last_completed`).
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.last_completed = at;
        self
    }

    pub fn with_remote_id(mut self, remote_id: Option<RemoteId>) -> Self {
        self.remote_id = remote_id;
        self
    }
}

/// Current time truncated to the millisecond precision timestamps are stored with.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

/// Stored timestamp format: RFC 3339, UTC, millisecond precision. Sorts lexically.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(column: &str, value: &str) -> crate::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| crate::Error::invalid_record(format!("Invalid {}: {}", column, e)))
}

fn to_counter(column: &str, value: i64) -> crate::Result<u32> {
    u32::try_from(value)
        .map_err(|_| crate::Error::invalid_record(format!("Invalid {}: {}", column, value)))
}

/// Database model for habits, one field per column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub streak_count: i64,
    pub best_streak: i64,
    pub total_count: i64,
    pub last_completed: String,
    pub created_at: String,
    pub user_id: String,
    pub remote_id: Option<String>,
}

impl HabitRecord {
    /// Read a row selected with [`habits::ALL`].
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(HabitRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            frequency: row.get(3)?,
            streak_count: row.get(4)?,
            best_streak: row.get(5)?,
            total_count: row.get(6)?,
            last_completed: row.get(7)?,
            created_at: row.get(8)?,
            user_id: row.get(9)?,
            remote_id: row.get(10)?,
        })
    }

    /// Convert to a domain habit.
    pub fn to_habit(&self) -> crate::Result<Habit> {
        Ok(Habit {
            id: HabitId(self.id),
            title: self.title.clone(),
            description: self.description.clone(),
            frequency: self.frequency.parse()?,
            streak_count: to_counter(habits::STREAK_COUNT, self.streak_count)?,
            best_streak: to_counter(habits::BEST_STREAK, self.best_streak)?,
            total_count: to_counter(habits::TOTAL_COUNT, self.total_count)?,
            last_completed: parse_timestamp(habits::LAST_COMPLETED, &self.last_completed)?,
            created_at: parse_timestamp(habits::CREATED_AT, &self.created_at)?,
            user_id: UserId(self.user_id.clone()),
            remote_id: self.remote_id.clone().map(RemoteId),
        })
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Database operations for habits.
pub struct HabitStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> HabitStore<'a> {
    /// Create a new habit store.
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Insert a new habit and return its store-assigned id.
    pub fn create(&self, habit: &NewHabit) -> crate::Result<HabitId> {
        self.conn.execute(
            r#"
            INSERT INTO habits (title, description, frequency, streak_count, best_streak, total_count, last_completed, created_at, user_id, remote_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.streak_count,
                habit.best_streak,
                habit.total_count,
                format_timestamp(&habit.last_completed),
                format_timestamp(&habit.created_at),
                habit.user_id.as_str(),
                habit.remote_id.as_ref().map(RemoteId::as_str),
            ],
        )?;
        let id = HabitId(self.conn.last_insert_rowid());
        debug!("Inserted habit {} for user {}", id, habit.user_id);
        Ok(id)
    }

    /// Get a habit by ID.
    pub fn get(&self, id: HabitId) -> crate::Result<Option<Habit>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", habits::ALL, TABLE_HABITS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id.0], HabitRecord::from_row)?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record.to_habit()?)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// All habits of `user_id`, newest first.
    pub fn list_all(&self, user_id: &UserId) -> crate::Result<Vec<Habit>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            habits::ALL,
            TABLE_HABITS
        );
        self.query_habits(&sql, params![user_id.as_str()])
    }

    /// Up to `limit` habits with the longest current streaks.
    ///
    /// Equal streaks are ordered by id ascending, so older habits win ties.
    pub fn list_top_by_streak(&self, limit: usize) -> crate::Result<Vec<Habit>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY streak_count DESC, id ASC LIMIT ?",
            habits::ALL,
            TABLE_HABITS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_habits(&sql, params![limit])
    }

    /// Apply a sparse update.
    ///
    /// An empty patch does nothing, not even an existence check.
    pub fn update(&self, id: HabitId, patch: &HabitUpdate) -> crate::Result<()> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(());
        }

        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            TABLE_HABITS,
            set_clause,
            habits::ID
        );

        let mut values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
        values.push(Value::Integer(id.0));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(crate::Error::NotFound { id });
        }
        Ok(())
    }

    /// Delete one habit. Deleting a missing id succeeds.
    pub fn delete_one(&self, id: HabitId) -> crate::Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?", params![id.0])?;
        debug!("Deleted habit {} ({} row(s))", id, removed);
        Ok(())
    }

    /// Delete every listed habit in one statement and return how many rows went away.
    ///
    /// Missing ids are ignored; an empty list issues no statement.
    pub fn delete_many(&self, ids: &[HabitId]) -> crate::Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM {} WHERE id IN ({})",
            TABLE_HABITS,
            placeholders(ids.len())
        );
        let removed = self
            .conn
            .execute(&sql, params_from_iter(ids.iter().map(|id| id.0)))?;
        debug!("Deleted {} of {} requested habit(s)", removed, ids.len());
        Ok(removed)
    }

    /// Remote ids of the listed habits that were mirrored, ordered by habit id.
    pub fn remote_ids(&self, ids: &[HabitId]) -> crate::Result<Vec<(HabitId, RemoteId)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, remote_id FROM {} WHERE remote_id IS NOT NULL AND id IN ({}) ORDER BY id",
            TABLE_HABITS,
            placeholders(ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter().map(|id| id.0)), |row| {
            Ok((HabitId(row.get(0)?), RemoteId(row.get(1)?)))
        })?;

        let mut linked = Vec::new();
        for row in rows {
            linked.push(row?);
        }
        Ok(linked)
    }

    /// Record a completion of habit `id` at `at` and return the updated habit.
    ///
    /// A second completion within the same period leaves the habit unchanged.
    /// Callers should run this inside a transaction.
    pub fn record_completion(&self, id: HabitId, at: DateTime<Utc>) -> crate::Result<Habit> {
        let habit = self.get(id)?.ok_or(crate::Error::NotFound { id })?;

        let Some(state) = next_streak(&habit, at) else {
            debug!("Habit {} already completed for this period", id);
            return Ok(habit);
        };

        self.conn.execute(
            r#"
            UPDATE habits
            SET streak_count = ?, best_streak = ?, total_count = ?, last_completed = ?
            WHERE id = ?
            "#,
            params![
                state.streak_count,
                state.best_streak,
                state.total_count,
                format_timestamp(&at),
                id.0
            ],
        )?;

        self.get(id)?.ok_or(crate::Error::NotFound { id })
    }

    /// Number of stored habits across all users.
    pub fn count(&self) -> crate::Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habits", params![], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_habits<P: rusqlite::Params>(&self, sql: &str, params: P) -> crate::Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt.query_map(params, HabitRecord::from_row)?;

        let mut habits = Vec::new();
        for record in records {
            habits.push(record?.to_habit()?);
        }
        Ok(habits)
    }
}
