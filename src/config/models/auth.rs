//! Authentication configuration

use super::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Caller token verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity issuer
    #[serde(default)]
    pub jwt_secret: String,
    /// Expected `aud` claim; `None` disables the audience check
    #[serde(default = "default_jwt_audience")]
    pub audience: Option<String>,
    /// Clock skew tolerated on `exp`/`nbf`
    #[serde(default = "default_jwt_leeway_secs")]
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            audience: default_jwt_audience(),
            leeway_secs: default_jwt_leeway_secs(),
        }
    }
}

impl AuthConfig {
    /// Validate auth configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err("JWT secret is required (auth.jwt_secret or JWT_SECRET)".to_string());
        }
        if self.jwt_secret.len() < 32 {
            warn!("JWT secret is shorter than 32 characters");
        }
        Ok(())
    }
}
