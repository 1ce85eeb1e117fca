//! Validation helpers for contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Longest document id the server accepts
pub const MAX_DOCUMENT_ID_LEN: usize = 36;

/// Validate a habit document before sending it
pub fn validate_habit_document(document: &HabitDocument) -> Result<(), ApiContractError> {
    document.validate()?;

    if !FREQUENCIES.contains(&document.frequency.as_str()) {
        return Err(ApiContractError::InvalidFrequency(document.frequency.clone()));
    }

    Ok(())
}

/// Validate a client-chosen document id
///
/// Ids are 1 to 36 characters of `a-z A-Z 0-9 . - _` and may not start with a
/// special character.
pub fn validate_document_id(id: &str) -> Result<(), ApiContractError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    let valid_start = id.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());

    if id.len() > MAX_DOCUMENT_ID_LEN || !valid_chars || !valid_start {
        return Err(ApiContractError::InvalidDocumentId(id.to_string()));
    }
    Ok(())
}

/// Validate URL format
pub fn validate_url(url_str: &str) -> Result<(), ApiContractError> {
    url::Url::parse(url_str)?;
    Ok(())
}
