//! Upstream generative image service configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base, without the `/models/...` suffix
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Image-capable model name
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Full URL of the `generateContent` operation for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Validate upstream configuration
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid Gemini base_url '{}': {}", self.base_url, e))?;
        if self.model.trim().is_empty() {
            return Err("Gemini model cannot be empty".to_string());
        }
        if self.connect_timeout_secs == 0 {
            return Err("Connect timeout cannot be 0".to_string());
        }
        Ok(())
    }
}
