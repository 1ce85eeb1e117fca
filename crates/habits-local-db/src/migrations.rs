//! Database migration management.

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::schema::SCHEMA_VERSION;

/// Database migration manager.
pub struct MigrationManager;

impl MigrationManager {
    /// Apply all pending migrations to the database.
    pub fn migrate(conn: &Connection) -> crate::Result<()> {
        // Create schema migrations table first
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        let current_version = Self::current_version(conn)?.unwrap_or(0);
        if current_version > SCHEMA_VERSION {
            return Err(crate::Error::migration(format!(
                "database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            )));
        }

        // Apply migrations sequentially
        if current_version < 1 {
            info!("Applying habits schema migration 1");
            Self::apply_migration_1(conn)?;
        }

        debug!("Habits schema at version {}", SCHEMA_VERSION);
        Ok(())
    }

    /// Apply migration version 1 - the habits table
    fn apply_migration_1(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                description TEXT NOT NULL DEFAULT '',
                frequency TEXT NOT NULL CHECK (frequency IN ('Daily', 'Weekly', 'Monthly')),
                streak_count INTEGER NOT NULL DEFAULT 0 CHECK (streak_count >= 0),
                best_streak INTEGER NOT NULL DEFAULT 0 CHECK (best_streak >= 0),
                total_count INTEGER NOT NULL DEFAULT 0 CHECK (total_count >= 0),
                last_completed TEXT NOT NULL,
                created_at TEXT NOT NULL,
                user_id TEXT NOT NULL CHECK (length(user_id) > 0),
                remote_id TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_habits_user_created ON habits(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_habits_streak ON habits(streak_count);

            -- Mark migration as applied
            INSERT OR REPLACE INTO schema_migrations (version) VALUES (1);
            "#,
        )?;

        Ok(())
    }

    /// Get the current schema version.
    pub fn current_version(conn: &Connection) -> crate::Result<Option<u32>> {
        let mut stmt = conn.prepare("SELECT MAX(version) FROM schema_migrations")?;

        let version: Option<u32> = stmt.query_row(params![], |row| row.get(0))?;

        Ok(version)
    }
}
