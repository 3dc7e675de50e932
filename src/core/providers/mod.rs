//! Upstream image service implementations

pub mod gemini;

pub use gemini::GeminiClient;

use crate::config::GeminiConfig;
use crate::core::traits::ImageTransformer;
use crate::utils::error::Result;
use std::sync::Arc;

/// Build the configured upstream transformer
pub fn transformer_from_config(config: &GeminiConfig) -> Result<Arc<dyn ImageTransformer>> {
    Ok(Arc::new(GeminiClient::new(config)?))
}
