//! Local-first sync coordination.
//!
//! Every write goes to the local database, which decides success or failure.
//! The remote mirror, when configured, is updated opportunistically: its
//! failures and timeouts are logged and dropped by [`SyncCoordinator::best_effort`]
//! and never reach the caller.

use chrono::{DateTime, Utc};
use habits_client_api::{RemoteMirror, RemoteMirrorResult};
use habits_local_db::{Database, Habit, HabitId, HabitStore, HabitUpdate, NewHabit, RemoteId};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::document::{document_id_of, remote_id_from, to_document};
use crate::query::HabitQueries;

/// Default bound on a single remote mirror call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub remote_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedHabit {
    pub id: HabitId,
    pub remote_id: Option<RemoteId>,
}

impl CreatedHabit {
    pub fn is_mirrored(&self) -> bool {
        self.remote_id.is_some()
    }
}

/// What a bulk delete did. Remote failures are counted, not reported as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub requested: usize,
    pub deleted_locally: usize,
    pub remote_attempted: usize,
    pub remote_deleted: usize,
}

/// Sequences local and remote effects for habit writes.
pub struct SyncCoordinator {
    db: Database,
    remote: Option<Arc<dyn RemoteMirror>>,
    config: SyncConfig,
}

impl SyncCoordinator {
    /// A local-only coordinator.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            remote: None,
            config: SyncConfig::default(),
        }
    }

    /// Mirror writes to `remote`.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteMirror>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn is_mirrored(&self) -> bool {
        self.remote.is_some()
    }

    /// Read-only views over the same database.
    pub fn queries(&self) -> HabitQueries {
        HabitQueries::new(self.db.clone())
    }

    /// Create a habit: remote first (best effort), then locally.
    ///
    /// Only a local failure fails the create.
    pub async fn create(&self, habit: NewHabit) -> crate::Result<CreatedHabit> {
        if habit.title.trim().is_empty() {
            return Err(crate::Error::invalid_input("habit title is required"));
        }
        if habit.user_id.as_str().is_empty() {
            return Err(crate::Error::invalid_input("user id is required"));
        }

        let remote_id = match &self.remote {
            Some(remote) => {
                let document = to_document(&habit);
                self.best_effort("create", remote.create_document(&document))
                    .await
                    .map(remote_id_from)
            }
            None => None,
        };

        let habit = habit.with_remote_id(remote_id.clone());
        let id = self.db.with_connection(|conn| HabitStore::new(conn).create(&habit))?;

        match &remote_id {
            Some(remote_id) => info!("Created habit {} (mirrored as {})", id, remote_id),
            None => info!("Created habit {} (local only)", id),
        }
        Ok(CreatedHabit { id, remote_id })
    }

    /// Delete one habit locally, then its mirror if it has one.
    ///
    /// Deleting a missing id succeeds.
    pub async fn delete_one(&self, id: HabitId) -> crate::Result<()> {
        let linked = self.db.transaction(|conn| {
            let store = HabitStore::new(conn);
            let linked = store.remote_ids(&[id])?;
            store.delete_one(id)?;
            Ok(linked)
        })?;
        info!("Deleted habit {}", id);

        for (_, remote_id) in linked {
            self.delete_remote(&remote_id).await;
        }
        Ok(())
    }

    /// Delete several habits in one local statement, then each mirror on its own.
    ///
    /// One failed remote delete does not stop the others.
    pub async fn delete_many(&self, ids: &[HabitId]) -> crate::Result<BulkDeleteReport> {
        let mut report = BulkDeleteReport {
            requested: ids.len(),
            ..BulkDeleteReport::default()
        };
        if ids.is_empty() {
            return Ok(report);
        }

        let (linked, deleted) = self.db.transaction(|conn| {
            let store = HabitStore::new(conn);
            let linked = store.remote_ids(ids)?;
            let deleted = store.delete_many(ids)?;
            Ok((linked, deleted))
        })?;
        report.deleted_locally = deleted;
        info!("Deleted {} habit(s) locally", deleted);

        for (_, remote_id) in linked {
            if self.remote.is_none() {
                break;
            }
            report.remote_attempted += 1;
            if self.delete_remote(&remote_id).await {
                report.remote_deleted += 1;
            }
        }

        debug!("Bulk delete finished: {:?}", report);
        Ok(report)
    }

    /// Apply a sparse update locally. The mirror is not updated.
    pub fn update(&self, id: HabitId, patch: &HabitUpdate) -> crate::Result<()> {
        self.db
            .with_connection(|conn| HabitStore::new(conn).update(id, patch))?;
        Ok(())
    }

    /// Record a completion now.
    pub fn complete(&self, id: HabitId) -> crate::Result<Habit> {
        self.complete_at(id, Utc::now())
    }

    /// Record a completion at `at`. Local only.
    pub fn complete_at(&self, id: HabitId, at: DateTime<Utc>) -> crate::Result<Habit> {
        let habit = self
            .db
            .transaction(|conn| HabitStore::new(conn).record_completion(id, at))?;
        debug!(
            "Habit {} streak {} (best {}, total {})",
            id, habit.streak_count, habit.best_streak, habit.total_count
        );
        Ok(habit)
    }

    /// Close the local database.
    pub fn close(self) -> crate::Result<()> {
        self.db.close()?;
        Ok(())
    }

    /// Returns whether the remote document is gone.
    async fn delete_remote(&self, remote_id: &RemoteId) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };
        let document_id = document_id_of(remote_id);
        self.best_effort("delete", remote.delete_document(&document_id))
            .await
            .is_some()
    }

    /// Run a remote call under the configured timeout. Any failure becomes `None`.
    async fn best_effort<T, F>(&self, operation: &str, call: F) -> Option<T>
    where
        F: Future<Output = RemoteMirrorResult<T>>,
    {
        match tokio::time::timeout(self.config.remote_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!("Remote mirror {} failed, continuing locally: {}", operation, e);
                None
            }
            Err(_) => {
                warn!(
                    "Remote mirror {} timed out after {:?}, continuing locally",
                    operation, self.config.remote_timeout
                );
                None
            }
        }
    }
}
