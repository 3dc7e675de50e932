//! Identity provider
//!
//! Verifies the bearer token presented by a caller and yields the caller's
//! [`Identity`]. The default implementation checks HS256 tokens signed with
//! the secret shared with the upstream identity issuer.

use super::types::Identity;
use crate::config::AuthConfig;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Turns an opaque bearer token into a verified caller identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity>;
}

/// Claims read from caller tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (unix seconds)
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// HS256 JWT verifier
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("JWT verification failed: {}", e);
                GatewayError::unauthorized("Invalid access token")
            })?;

        let claims = token_data.claims;
        if claims.sub.trim().is_empty() {
            return Err(GatewayError::unauthorized("Token has no subject"));
        }

        debug!("Token verified for user: {}", claims.sub);
        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
