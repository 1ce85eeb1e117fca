//! REST client for the habits remote mirror
//!
//! Talks to a document database over HTTP: one collection holds one document
//! per mirrored habit. The client only creates and deletes documents, which is
//! all the sync coordinator asks of a [`RemoteMirror`].

pub mod auth;
pub mod client;
pub mod error;

pub use auth::*;
pub use client::*;
pub use error::*;

use async_trait::async_trait;
use habits_client_api::{RemoteMirror, RemoteMirrorError, RemoteMirrorResult};
use habits_rest_api_contract::*;
use reqwest::StatusCode;

impl From<RestClientError> for RemoteMirrorError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Http(e) if e.is_timeout() || e.is_connect() => {
                RemoteMirrorError::Unavailable(e.to_string())
            }
            RestClientError::Http(e) => RemoteMirrorError::Transport(e.to_string()),
            RestClientError::ServerError { status, details }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                RemoteMirrorError::Auth(details.message)
            }
            RestClientError::ServerError { status, details } => RemoteMirrorError::Server {
                status: status.as_u16(),
                message: details.message,
            },
            RestClientError::ApiContract(e) => RemoteMirrorError::Validation(e.to_string()),
            RestClientError::Auth(message) => RemoteMirrorError::Auth(message),
            other => RemoteMirrorError::Unexpected(other.to_string()),
        }
    }
}

#[async_trait]
impl RemoteMirror for client::RestClient {
    async fn create_document(&self, document: &HabitDocument) -> RemoteMirrorResult<DocumentId> {
        let response = client::RestClient::create_document(self, document).await?;
        Ok(response.id)
    }

    async fn delete_document(&self, id: &DocumentId) -> RemoteMirrorResult<()> {
        client::RestClient::delete_document(self, id).await?;
        Ok(())
    }
}
