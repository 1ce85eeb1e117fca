//! Streak bookkeeping for completion events.
//!
//! A habit's frequency defines its period: a UTC calendar day, an ISO week
//! (Monday to Sunday) or a calendar month. One completion per period counts.
//! Completing in the period right after the previous completion extends the
//! streak; skipping one or more periods restarts it at 1.

use chrono::{DateTime, Datelike, Utc};

use crate::models::{Frequency, Habit};

/// Counter values after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub streak_count: u32,
    pub best_streak: u32,
    pub total_count: u32,
}

/// Sequential index of the period containing `at`. Adjacent periods differ by 1.
pub fn period_index(frequency: Frequency, at: DateTime<Utc>) -> i64 {
    let date = at.date_naive();
    match frequency {
        Frequency::Daily => i64::from(date.num_days_from_ce()),
        Frequency::Weekly => {
            let monday = i64::from(date.num_days_from_ce())
                - i64::from(date.weekday().num_days_from_monday());
            monday.div_euclid(7)
        }
        Frequency::Monthly => i64::from(date.year()) * 12 + i64::from(date.month0()),
    }
}

/// Counters after completing `habit` at `at`, or `None` when the habit was
/// already completed in that period (or in a later one).
pub fn next_streak(habit: &Habit, at: DateTime<Utc>) -> Option<StreakState> {
    let never_completed = habit.total_count == 0;
    let gap = period_index(habit.frequency, at) - period_index(habit.frequency, habit.last_completed);

    if !never_completed && gap <= 0 {
        return None;
    }

    let streak_count = if !never_completed && gap == 1 {
        habit.streak_count.saturating_add(1)
    } else {
        1
    };

    Some(StreakState {
        streak_count,
        best_streak: habit.best_streak.max(streak_count),
        total_count: habit.total_count.saturating_add(1),
    })
}
