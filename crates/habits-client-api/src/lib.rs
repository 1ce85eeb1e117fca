//! Remote mirror trait for the habits data layer
//!
//! The sync coordinator only needs two things from a remote store: create a
//! document and get back its id, and delete a document by id. Anything that
//! can do both (the REST client, the in-memory mock) implements
//! [`RemoteMirror`].

use async_trait::async_trait;
use habits_rest_api_contract::{DocumentId, HabitDocument};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteMirrorError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("invalid document: {0}")]
    Validation(String),
    #[error("remote mirror unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

pub type RemoteMirrorResult<T> = Result<T, RemoteMirrorError>;

#[async_trait]
pub trait RemoteMirror: Send + Sync {
    /// Store `document` remotely and return the id the server assigned.
    async fn create_document(&self, document: &HabitDocument) -> RemoteMirrorResult<DocumentId>;

    /// Remove a previously mirrored document.
    async fn delete_document(&self, id: &DocumentId) -> RemoteMirrorResult<()>;
}
