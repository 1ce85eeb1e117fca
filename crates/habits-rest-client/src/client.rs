//! Main REST client implementation

use habits_rest_api_contract::validation::validate_habit_document;
use habits_rest_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::auth::AuthConfig;
use crate::error::{RestClientError, RestClientResult};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the habit collection lives and how to reach it
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    pub base_url: Url,
    pub database_id: String,
    pub collection_id: String,
    pub auth: AuthConfig,
    pub timeout: Duration,
}

impl RestClientConfig {
    /// Create a config from a base URL string, e.g. `https://cloud.example.com/v1`
    pub fn new(
        base_url: &str,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> RestClientResult<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            auth: AuthConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// REST client for the remote habit collection
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    config: RestClientConfig,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: RestClientConfig) -> RestClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("habits/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Get the client configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// URL of the habit collection's documents
    pub fn documents_url(&self) -> RestClientResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RestClientError::InvalidBaseUrl(self.config.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "databases",
                self.config.database_id.as_str(),
                "collections",
                self.config.collection_id.as_str(),
                "documents",
            ]);
        Ok(url)
    }

    /// URL of a single document
    pub fn document_url(&self, id: &DocumentId) -> RestClientResult<Url> {
        let mut url = self.documents_url()?;
        url.path_segments_mut()
            .map_err(|_| RestClientError::InvalidBaseUrl(self.config.base_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    /// Create a habit document
    pub async fn create_document(
        &self,
        document: &HabitDocument,
    ) -> RestClientResult<DocumentResponse> {
        validate_habit_document(document)?;

        let request = CreateDocumentRequest {
            document_id: new_document_id(),
            data: document.clone(),
        };
        debug!("Creating remote document {}", request.document_id);
        self.request(Method::POST, self.documents_url()?, Some(&request)).await
    }

    /// Delete a habit document
    pub async fn delete_document(&self, id: &DocumentId) -> RestClientResult<()> {
        debug!("Deleting remote document {}", id);
        let response = self.send(Method::DELETE, self.document_url(id)?, None::<&()>).await?;
        self.handle_empty_response(response).await
    }

    // Private helper methods

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let response = self.send(method, url, body).await?;
        self.handle_response(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        let mut request = self.http_client.request(method, url);

        // Add authentication headers
        let auth_headers = self
            .config
            .auth
            .headers()
            .map_err(|e| RestClientError::Auth(e.to_string()))?;
        request = request.headers(auth_headers);

        // Add body if provided
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> RestClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(RestClientError::from)
        } else {
            Err(error_from_body(status, text))
        }
    }

    async fn handle_empty_response(&self, response: Response) -> RestClientResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(error_from_body(status, text))
    }
}

fn error_from_body(status: StatusCode, text: String) -> RestClientError {
    match serde_json::from_str::<ProblemDetails>(&text) {
        Ok(details) => RestClientError::ServerError { status, details },
        Err(_) => RestClientError::UnexpectedResponse(format!("{}: {}", status, text)),
    }
}

/// Client-chosen id for a new document: 32 lowercase hex characters.
fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
