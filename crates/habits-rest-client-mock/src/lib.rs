//! In-memory remote mirror.
//!
//! Behaves like the document server for the two calls the sync coordinator
//! makes, keeps every document in memory, records each call, and can be told
//! to fail, go offline, or answer slowly.

use async_trait::async_trait;
use habits_client_api::{RemoteMirror, RemoteMirrorError, RemoteMirrorResult};
use habits_rest_api_contract::{DocumentId, HabitDocument};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Create { title: String },
    Delete { id: DocumentId },
}

#[derive(Debug, Default)]
struct MockState {
    documents: BTreeMap<DocumentId, HabitDocument>,
    calls: Vec<MockCall>,
    next_id: u64,
    offline: bool,
    fail_creates: bool,
    fail_deletes: bool,
    failing_ids: HashSet<DocumentId>,
}

/// Remote mirror backed by a map. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRemoteMirror {
    state: Arc<Mutex<MockState>>,
    latency: Option<Duration>,
}

impl MockRemoteMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mirror that refuses every call, like an unreachable server.
    pub fn offline() -> Self {
        let mock = Self::new();
        mock.set_offline(true);
        mock
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn fail_creates(&self, fail: bool) {
        self.state().fail_creates = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state().fail_deletes = fail;
    }

    /// Make deletes of this one document fail.
    pub fn fail_delete_of(&self, id: DocumentId) {
        self.state().failing_ids.insert(id);
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.state().documents.contains_key(id)
    }

    pub fn document(&self, id: &DocumentId) -> Option<HabitDocument> {
        self.state().documents.get(id).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.state().documents.len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RemoteMirror for MockRemoteMirror {
    async fn create_document(&self, document: &HabitDocument) -> RemoteMirrorResult<DocumentId> {
        self.simulate_latency().await;

        let mut state = self.state();
        state.calls.push(MockCall::Create {
            title: document.title.clone(),
        });

        if state.offline {
            return Err(RemoteMirrorError::Unavailable("mock mirror is offline".to_string()));
        }
        if state.fail_creates {
            return Err(RemoteMirrorError::Server {
                status: 500,
                message: "mock create failure".to_string(),
            });
        }

        state.next_id += 1;
        let id = DocumentId::new(format!("mock-doc-{}", state.next_id));
        state.documents.insert(id.clone(), document.clone());
        debug!("Mock mirror stored document {}", id);
        Ok(id)
    }

    async fn delete_document(&self, id: &DocumentId) -> RemoteMirrorResult<()> {
        self.simulate_latency().await;

        let mut state = self.state();
        state.calls.push(MockCall::Delete { id: id.clone() });

        if state.offline {
            return Err(RemoteMirrorError::Unavailable("mock mirror is offline".to_string()));
        }
        if state.fail_deletes || state.failing_ids.contains(id) {
            return Err(RemoteMirrorError::Server {
                status: 500,
                message: format!("mock delete failure for {}", id),
            });
        }

        match state.documents.remove(id) {
            Some(_) => Ok(()),
            None => Err(RemoteMirrorError::Server {
                status: 404,
                message: format!("document {} not found", id),
            }),
        }
    }
}
