//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Caller authentication
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upstream image service
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Batch scheduling
    #[serde(default)]
    pub batch: BatchConfig,
    /// Per-user credential lookup
    #[serde(default)]
    pub secrets: SecretStoreConfig,
}
