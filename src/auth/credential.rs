//! Credential resolver

use super::secrets::SecretStore;
use super::types::{Credential, Identity};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Obtains the upstream credential for a caller, once per batch
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn SecretStore>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Resolve the caller's credential.
    ///
    /// An absent or blank key is [`GatewayError::NotConfigured`]; a store
    /// failure propagates unchanged.
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn resolve(&self, identity: &Identity) -> Result<Credential> {
        match self.store.lookup(identity).await? {
            Some(credential) if !credential.is_empty() => {
                debug!(key_len = credential.len(), "Resolved upstream credential");
                Ok(credential)
            }
            _ => {
                warn!("No upstream API key configured");
                Err(GatewayError::not_configured(
                    "No Gemini API key configured for this user",
                ))
            }
        }
    }
}
