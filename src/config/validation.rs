//! Configuration validation
//!
//! Every configuration section validates itself; [`GatewayConfig`] folds the
//! section results into one message naming the offending section.

use super::models::*;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.auth
            .validate()
            .map_err(|e| format!("Auth config error: {}", e))?;
        self.gemini
            .validate()
            .map_err(|e| format!("Gemini config error: {}", e))?;
        self.batch
            .validate()
            .map_err(|e| format!("Batch config error: {}", e))?;
        self.secrets
            .validate()
            .map_err(|e| format!("Secrets config error: {}", e))?;
        Ok(())
    }
}
