//! Environment overrides
//!
//! Values from the process environment take precedence over the YAML file.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl GatewayConfig {
    /// Overlay recognised environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        debug!("Applying environment overrides");

        if let Ok(host) = env::var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var("GATEWAY_PORT")? {
            self.server.port = port;
        }

        if let Ok(secret) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            self.gemini.model = model;
        }

        if let Some(concurrency) = parse_var("BATCH_CONCURRENCY")? {
            self.batch.concurrency = concurrency;
        }
        if let Some(delay) = parse_var("BATCH_GROUP_DELAY_MS")? {
            self.batch.group_delay_ms = delay;
        }
        if let Some(timeout) = parse_var("BATCH_ITEM_TIMEOUT_SECS")? {
            self.batch.item_timeout_secs = timeout;
        }
        if let Some(max_items) = parse_var("BATCH_MAX_ITEMS")? {
            self.batch.max_items = max_items;
        }

        // A store URL switches to the REST backend
        if let Ok(url) = env::var("SECRET_STORE_URL") {
            let service_key = env::var("SECRET_STORE_SERVICE_KEY").unwrap_or_default();
            self.secrets = match std::mem::take(&mut self.secrets) {
                SecretStoreConfig::Rest {
                    table,
                    column,
                    user_column,
                    service_key: existing,
                    ..
                } => SecretStoreConfig::Rest {
                    url,
                    service_key: if service_key.is_empty() {
                        existing
                    } else {
                        service_key
                    },
                    table,
                    column,
                    user_column,
                },
                SecretStoreConfig::Static { .. } => SecretStoreConfig::Rest {
                    url,
                    service_key,
                    table: default_settings_table(),
                    column: default_settings_column(),
                    user_column: default_user_column(),
                },
            };
        } else if let Ok(key) = env::var("SECRET_STORE_SERVICE_KEY") {
            if let SecretStoreConfig::Rest { service_key, .. } = &mut self.secrets {
                *service_key = key;
            }
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
