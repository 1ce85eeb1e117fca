//! Database schema definitions and constants.

// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

// Table names
pub const TABLE_SCHEMA_MIGRATIONS: &str = "schema_migrations";
pub const TABLE_HABITS: &str = "habits";

// Column names for habits table
pub mod habits {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const FREQUENCY: &str = "frequency";
    pub const STREAK_COUNT: &str = "streak_count";
    pub const BEST_STREAK: &str = "best_streak";
    pub const TOTAL_COUNT: &str = "total_count";
    pub const LAST_COMPLETED: &str = "last_completed";
    pub const CREATED_AT: &str = "created_at";
    pub const USER_ID: &str = "user_id";
    pub const REMOTE_ID: &str = "remote_id";

    /// Column list in the order `HabitRecord::from_row` reads it.
    pub const ALL: &str = "id, title, description, frequency, streak_count, best_streak, \
                           total_count, last_completed, created_at, user_id, remote_id";
}
