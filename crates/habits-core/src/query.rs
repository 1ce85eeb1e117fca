//! Read-side queries over local habit state.

use habits_local_db::{Database, Frequency, Habit, HabitId, HabitStore, UserId};
use serde::Serialize;

/// Number of habits the top-streaks view shows by default.
pub const DEFAULT_TOP_STREAKS: usize = 3;

/// Per-habit streak figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    pub id: HabitId,
    pub title: String,
    pub frequency: Frequency,
    pub current: u32,
    pub best: u32,
    pub total: u32,
}

impl From<&Habit> for HabitStats {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id,
            title: habit.title.clone(),
            frequency: habit.frequency,
            current: habit.streak_count,
            best: habit.best_streak,
            total: habit.total_count,
        }
    }
}

/// Streak overview for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub habits: Vec<HabitStats>,
    pub habit_count: usize,
    pub total_completions: u64,
    pub best_streak: u32,
}

/// Read-only access to habits.
#[derive(Debug, Clone)]
pub struct HabitQueries {
    db: Database,
}

impl HabitQueries {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every habit owned by `user_id`, newest first.
    pub fn all_habits(&self, user_id: &UserId) -> crate::Result<Vec<Habit>> {
        let habits = self
            .db
            .with_connection(|conn| HabitStore::new(conn).list_all(user_id))?;
        Ok(habits)
    }

    /// Up to `limit` habits with the highest current streak, across all users.
    pub fn top_streaks(&self, limit: usize) -> crate::Result<Vec<Habit>> {
        let habits = self
            .db
            .with_connection(|conn| HabitStore::new(conn).list_top_by_streak(limit))?;
        Ok(habits)
    }

    pub fn top_streaks_default(&self) -> crate::Result<Vec<Habit>> {
        self.top_streaks(DEFAULT_TOP_STREAKS)
    }

    pub fn habit(&self, id: HabitId) -> crate::Result<Habit> {
        self.db
            .with_connection(|conn| HabitStore::new(conn).get(id))?
            .ok_or(crate::Error::NotFound { id })
    }

    pub fn streak_summary(&self, user_id: &UserId) -> crate::Result<StreakSummary> {
        let habits = self.all_habits(user_id)?;
        Ok(summarize(&habits))
    }
}

fn summarize(habits: &[Habit]) -> StreakSummary {
    StreakSummary {
        habits: habits.iter().map(HabitStats::from).collect(),
        habit_count: habits.len(),
        total_completions: habits.iter().map(|h| u64::from(h.total_count)).sum(),
        best_streak: habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
    }
}
