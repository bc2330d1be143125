//! HTTP access to remote registries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;

/// One JSON GET against a registry. Adapters depend on this seam, not on reqwest.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, IngestError>;
}

/// reqwest-backed registry client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRegistry {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, IngestError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|source| IngestError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Send `api_key` with every request (openFDA quota).
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[async_trait]
impl RegistryClient for HttpRegistry {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, IngestError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }
        debug!(%url, ?query, "registry request");

        let resp = request.send().await.map_err(|source| IngestError::Http {
            url: url.clone(),
            source,
        })?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                url,
                status: resp.status(),
            });
        }
        resp.json::<Value>()
            .await
            .map_err(|source| IngestError::Decode { url, source })
    }
}
