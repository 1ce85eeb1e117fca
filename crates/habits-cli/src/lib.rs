//! Habits CLI library

pub mod commands;
pub mod config;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

use habits_core::{Frequency, HabitId, DEFAULT_TOP_STREAKS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "habits")]
#[command(about = "Local-first habit tracker")]
#[command(version, author, long_about = None)]
pub struct Cli {
    /// Path of the habits database file
    #[arg(long, global = true, env = "HABITS_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Account that owns the habits
    #[arg(long, global = true, env = "HABITS_USER_ID", default_value = "local")]
    pub user: String,

    #[command(flatten)]
    pub remote: config::RemoteArgs,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "error")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create a habit
    Add {
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// daily, weekly or monthly
        #[arg(long, default_value = "daily", value_parser = parse_frequency)]
        frequency: Frequency,
    },
    /// List your habits, newest first
    List,
    /// Show the habits with the longest current streaks
    Top {
        #[arg(long, default_value_t = DEFAULT_TOP_STREAKS)]
        limit: usize,
    },
    /// Streak statistics for your habits
    Stats,
    /// Mark a habit as done now
    Complete {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
    },
    /// Delete one or more habits
    Delete {
        #[arg(required = true, num_args = 1.., value_parser = parse_habit_id)]
        ids: Vec<HabitId>,
    },
}

fn parse_frequency(value: &str) -> Result<Frequency, String> {
    value.parse::<Frequency>().map_err(|e| e.to_string())
}

fn parse_habit_id(value: &str) -> Result<HabitId, String> {
    value
        .trim()
        .parse::<i64>()
        .map(HabitId)
        .map_err(|_| format!("invalid habit id: {value}"))
}
