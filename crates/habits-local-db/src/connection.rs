//! Database connection management.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// File name of the habits database inside the state directory.
pub const DATABASE_FILE_NAME: &str = "habits.db";

/// Database connection wrapper.
///
/// One handle owns the single SQLite connection of the process. Clones share
/// it; statements are serialized through the mutex.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Get the default database path based on HABITS_HOME environment variable or platform defaults.
    ///
    /// Priority order:
    /// 1. HABITS_HOME environment variable (custom)
    /// 2. Platform-specific defaults:
    ///    - Linux: `${XDG_STATE_HOME:-~/.local/state}/habits/habits.db`
    ///    - macOS: `~/Library/Application Support/habits/habits.db`
    ///    - Windows: `%LOCALAPPDATA%\habits\habits.db`
    pub fn default_path() -> crate::Result<PathBuf> {
        if let Ok(habits_home) = std::env::var("HABITS_HOME") {
            return Ok(PathBuf::from(habits_home).join(DATABASE_FILE_NAME));
        }

        #[cfg(target_os = "linux")]
        {
            let state_home = match std::env::var("XDG_STATE_HOME") {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => home_dir()?.join(".local").join("state"),
            };
            Ok(state_home.join("habits").join(DATABASE_FILE_NAME))
        }

        #[cfg(target_os = "macos")]
        {
            Ok(home_dir()?
                .join("Library")
                .join("Application Support")
                .join("habits")
                .join(DATABASE_FILE_NAME))
        }

        #[cfg(target_os = "windows")]
        {
            let local_appdata = std::env::var("LOCALAPPDATA").map_err(|_| {
                crate::Error::generic("LOCALAPPDATA environment variable not set")
            })?;
            Ok(PathBuf::from(local_appdata).join("habits").join(DATABASE_FILE_NAME))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Ok(home_dir()?.join(".habits").join(DATABASE_FILE_NAME))
        }
    }

    /// Open the database at the default path.
    pub fn open_default() -> crate::Result<Self> {
        let path = Self::default_path()?;
        Self::open(&path)
    }
}

impl Database {
    /// Open a new database connection at the specified path.
    ///
    /// If the path doesn't exist, the database (and its parent directory) will be created.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        info!("Opened habits database at {}", path.display());
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initialize the database schema.
    fn initialize_schema(conn: &Connection) -> crate::Result<()> {
        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // Apply migrations to bring schema up to date
        crate::migrations::MigrationManager::migrate(conn)?;

        Ok(())
    }

    /// Lock the underlying connection.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn lock(&self) -> crate::Result<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })
    }

    /// Run `f` with the locked connection.
    pub fn with_connection<F, T>(&self, f: F) -> crate::Result<T>
    where
        F: FnOnce(&Connection) -> crate::Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a transaction with automatic rollback on error.
    pub fn transaction<F, T>(&self, f: F) -> crate::Result<T>
    where
        F: FnOnce(&Connection) -> crate::Result<T>,
    {
        let conn = self.lock()?;

        let tx = conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(result) => {
                tx.commit()?;
                Ok(result)
            }
            Err(e) => {
                tx.rollback()?;
                Err(e)
            }
        }
    }

    /// Close the connection.
    ///
    /// When other clones of this handle are still alive the connection stays
    /// open and is closed when the last clone is dropped.
    pub fn close(self) -> crate::Result<()> {
        match Arc::try_unwrap(self.connection) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
                conn.close().map_err(|(_, e)| crate::Error::from(e))?;
                info!("Closed habits database");
                Ok(())
            }
            Err(_) => {
                debug!("Database handle still shared, deferring close to the last owner");
                Ok(())
            }
        }
    }
}

fn home_dir() -> crate::Result<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| crate::Error::generic("HOME environment variable not set"))
}
