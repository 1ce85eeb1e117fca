//! Remote mirror settings

use anyhow::{Context, Result};
use clap::Args;
use habits_rest_client::{AuthConfig, RestClient, RestClientConfig};
use std::time::Duration;

/// Connection settings for the optional remote mirror.
///
/// The mirror is used only when URL, database and collection are all set.
#[derive(Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// Base URL of the document service, e.g. https://cloud.example.com/v1
    #[arg(long, global = true, env = "HABITS_REMOTE_URL")]
    pub remote_url: Option<String>,

    #[arg(long, global = true, env = "HABITS_REMOTE_DATABASE_ID")]
    pub remote_database: Option<String>,

    #[arg(long, global = true, env = "HABITS_REMOTE_COLLECTION_ID")]
    pub remote_collection: Option<String>,

    #[arg(long, global = true, env = "HABITS_REMOTE_PROJECT_ID")]
    pub remote_project: Option<String>,

    #[arg(long, global = true, env = "HABITS_REMOTE_API_KEY", hide_env_values = true)]
    pub remote_api_key: Option<String>,

    /// Give up on a remote call after this many seconds
    #[arg(long, global = true, env = "HABITS_REMOTE_TIMEOUT_SECS", default_value_t = 5)]
    pub remote_timeout_secs: u64,
}

impl RemoteArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Client settings, or `None` when the mirror is not configured.
    pub fn client_config(&self) -> Result<Option<RestClientConfig>> {
        let (Some(url), Some(database), Some(collection)) = (
            self.remote_url.as_deref(),
            self.remote_database.as_deref(),
            self.remote_collection.as_deref(),
        ) else {
            return Ok(None);
        };

        let mut auth = match &self.remote_api_key {
            Some(key) => AuthConfig::with_api_key(key.clone()),
            None => AuthConfig::default(),
        };
        if let Some(project) = &self.remote_project {
            auth = auth.with_project_id(project.clone());
        }

        let config = RestClientConfig::new(url, database, collection)
            .with_context(|| format!("invalid remote mirror URL: {url}"))?
            .with_auth(auth)
            .with_timeout(self.timeout());
        Ok(Some(config))
    }

    pub fn build_client(&self) -> Result<Option<RestClient>> {
        match self.client_config()? {
            Some(config) => {
                let client = RestClient::new(config).context("failed to build remote mirror client")?;
                Ok(Some(client))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> RemoteArgs {
        RemoteArgs {
            remote_url: Some("https://cloud.example.com/v1".to_string()),
            remote_database: Some("main".to_string()),
            remote_collection: Some("habits".to_string()),
            remote_project: Some("habit-app".to_string()),
            remote_api_key: Some("secret".to_string()),
            remote_timeout_secs: 2,
        }
    }

    #[test]
    fn test_mirror_disabled_unless_fully_configured() {
        let mut args = full();
        args.remote_collection = None;
        assert!(args.client_config().unwrap().is_none());
        assert!(RemoteArgs::default().build_client().unwrap().is_none());
    }

    #[test]
    fn test_full_configuration() {
        let config = full().client_config().unwrap().unwrap();
        assert_eq!(config.database_id, "main");
        assert_eq!(config.collection_id, "habits");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.auth.project_id.as_deref(), Some("habit-app"));
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let mut args = full();
        args.remote_url = Some("not a url".to_string());
        assert!(args.client_config().is_err());
    }
}
