//! Error types for contract validation and parsing

use thiserror::Error;

/// Errors that can occur during contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),
}

/// Error body returned by the document server
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(default, alias = "detail")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(rename = "type", default)]
    pub problem_type: String,
}
