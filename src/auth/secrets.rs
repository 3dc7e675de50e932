//! Secret store backends
//!
//! A secret store maps a caller identity to the upstream API key stored in
//! that caller's settings. Absence is a normal answer (`Ok(None)`); only a
//! failure to ask is an error.

use super::types::{Credential, Identity};
use crate::config::SecretStoreConfig;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Per-user credential lookup
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn lookup(&self, identity: &Identity) -> Result<Option<Credential>>;
}

/// Build the configured secret store
pub fn secret_store_from_config(config: &SecretStoreConfig) -> Result<Arc<dyn SecretStore>> {
    match config {
        SecretStoreConfig::Static { keys } => Ok(Arc::new(StaticSecretStore::new(keys.clone()))),
        SecretStoreConfig::Rest {
            url,
            service_key,
            table,
            column,
            user_column,
        } => Ok(Arc::new(RestSecretStore::new(
            url,
            service_key,
            table,
            column,
            user_column,
        )?)),
    }
}

/// In-memory user id → key map
#[derive(Debug, Default, Clone)]
pub struct StaticSecretStore {
    keys: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new(keys: HashMap<String, String>) -> Self {
        Self { keys }
    }

    pub fn with_key(mut self, user_id: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(user_id.into(), key.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn lookup(&self, identity: &Identity) -> Result<Option<Credential>> {
        Ok(self.keys.get(&identity.user_id).map(Credential::new))
    }
}

/// Settings table behind a PostgREST endpoint
///
/// Issues `GET {url}/rest/v1/{table}?select={column}&{user_column}=eq.{id}`
/// authenticated with the service key.
pub struct RestSecretStore {
    http_client: Client,
    endpoint: String,
    service_key: String,
    column: String,
    user_column: String,
}

impl RestSecretStore {
    pub fn new(
        url: &str,
        service_key: &str,
        table: &str,
        column: &str,
        user_column: &str,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/rest/v1/{}", url.trim_end_matches('/'), table),
            service_key: service_key.to_string(),
            column: column.to_string(),
            user_column: user_column.to_string(),
        })
    }
}

#[async_trait]
impl SecretStore for RestSecretStore {
    async fn lookup(&self, identity: &Identity) -> Result<Option<Credential>> {
        let filter = format!("eq.{}", identity.user_id);
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("select", self.column.as_str()),
                (self.user_column.as_str(), filter.as_str()),
                ("limit", "1"),
            ])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| {
                error!("Secret store request failed: {}", e);
                GatewayError::secret_store(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Secret store returned {}: {}", status, body);
            return Err(GatewayError::secret_store(format!(
                "lookup returned status {}",
                status.as_u16()
            )));
        }

        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            response.json().await.map_err(|e| {
                GatewayError::secret_store(format!("unreadable lookup response: {}", e))
            })?;

        let credential = rows
            .first()
            .and_then(|row| row.get(&self.column))
            .and_then(|value| value.as_str())
            .filter(|key| !key.trim().is_empty())
            .map(Credential::new);

        debug!(
            user_id = %identity.user_id,
            found = credential.is_some(),
            "Secret store lookup completed"
        );
        Ok(credential)
    }
}
