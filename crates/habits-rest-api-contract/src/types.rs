//! Contract types for the habits remote mirror

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Frequencies the remote collection accepts.
pub const FREQUENCIES: [&str; 3] = ["Daily", "Weekly", "Monthly"];

/// Server-side identifier of a mirrored document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Habit as stored in the remote collection
///
/// Only the fields other devices need to rebuild the habit. Counters other
/// than the current streak stay local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HabitDocument {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub frequency: String,
    pub streak_count: u32,
    pub last_completed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// Body of a create-document request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub data: HabitDocument,
}

/// Document metadata returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    #[serde(rename = "$id")]
    pub id: DocumentId,
    #[serde(rename = "$databaseId", default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(rename = "$collectionId", default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
