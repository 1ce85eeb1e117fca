//! Authentication methods for the remote mirror client

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

const PROJECT_HEADER: &str = "x-appwrite-project";
const API_KEY_HEADER: &str = "x-appwrite-key";
const JWT_HEADER: &str = "x-appwrite-jwt";

/// Authentication methods supported by the document server
#[derive(Debug, Clone, Default)]
pub enum AuthMethod {
    /// Server API key
    ApiKey(String),
    /// Short-lived JWT issued to a signed-in user
    Jwt(String),
    /// No authentication
    #[default]
    None,
}

impl AuthMethod {
    /// Apply authentication headers to a request
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        match self {
            AuthMethod::ApiKey(key) => {
                headers.insert(HeaderName::from_static(API_KEY_HEADER), HeaderValue::from_str(key)?);
            }
            AuthMethod::Jwt(token) => {
                headers.insert(HeaderName::from_static(JWT_HEADER), HeaderValue::from_str(token)?);
            }
            AuthMethod::None => {}
        }
        Ok(())
    }

    /// Create API key authentication
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create JWT authentication
    pub fn jwt(token: impl Into<String>) -> Self {
        Self::Jwt(token.into())
    }
}

/// Authentication configuration for the client
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub project_id: Option<String>,
}

impl AuthConfig {
    /// Create a new auth config with API key authentication
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            method: AuthMethod::api_key(key),
            project_id: None,
        }
    }

    /// Create a new auth config with JWT authentication
    pub fn with_jwt(token: impl Into<String>) -> Self {
        Self {
            method: AuthMethod::jwt(token),
            project_id: None,
        }
    }

    /// Set the project the collection belongs to
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Get headers for this authentication configuration
    pub fn headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        self.method.apply_to_headers(&mut headers)?;

        if let Some(project_id) = &self.project_id {
            headers.insert(
                HeaderName::from_static(PROJECT_HEADER),
                HeaderValue::from_str(project_id)?,
            );
        }

        Ok(headers)
    }
}
