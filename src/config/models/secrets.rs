//! Secret store configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where per-user upstream credentials are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum SecretStoreConfig {
    /// Fixed user id → key map, for local setups and tests
    Static {
        #[serde(default)]
        keys: HashMap<String, String>,
    },
    /// PostgREST-style settings table
    Rest {
        url: String,
        service_key: String,
        #[serde(default = "default_settings_table")]
        table: String,
        #[serde(default = "default_settings_column")]
        column: String,
        #[serde(default = "default_user_column")]
        user_column: String,
    },
}

impl Default for SecretStoreConfig {
    fn default() -> Self {
        SecretStoreConfig::Static {
            keys: HashMap::new(),
        }
    }
}

impl SecretStoreConfig {
    /// Validate secret store configuration
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SecretStoreConfig::Static { .. } => Ok(()),
            SecretStoreConfig::Rest {
                url, service_key, ..
            } => {
                url::Url::parse(url)
                    .map_err(|e| format!("Invalid secret store url '{}': {}", url, e))?;
                if service_key.is_empty() {
                    return Err("Secret store service_key cannot be empty".to_string());
                }
                Ok(())
            }
        }
    }
}
