//! Image transformer trait
//!
//! One call to the upstream generative image service. Implementations report
//! every failure as a [`TransformFailure`] so the batch engine can turn it
//! into a per-item outcome instead of aborting the batch.

use crate::auth::Credential;
use crate::core::batch::GeneratedImage;
use crate::core::encoder::EncodedImage;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a single upstream call produced no image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformFailure {
    /// Upstream answered with a non-success status other than 429
    #[error("upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// Upstream answered 429
    #[error("rate limited: {detail}")]
    RateLimited {
        detail: String,
        /// Retry hint from the upstream body, in seconds
        retry_after: Option<u64>,
    },

    #[error("timed out: {0}")]
    Timeout(String),

    /// 2xx response without a usable image
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Connection-level failure, no status received
    #[error("network error: {0}")]
    Network(String),
}

/// Upstream image editing service
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    /// Service name for logs
    fn name(&self) -> &'static str;

    /// Apply `instruction` to one image on behalf of the credential owner
    async fn transform(
        &self,
        credential: &Credential,
        image: &EncodedImage,
        instruction: &str,
    ) -> Result<GeneratedImage, TransformFailure>;

    /// Pass a raw request body through to the service and return its raw
    /// answer
    async fn forward(
        &self,
        _credential: &Credential,
        _body: Value,
    ) -> Result<Value, TransformFailure> {
        Err(TransformFailure::Upstream {
            status: 501,
            detail: format!("{} does not support raw forwarding", self.name()),
        })
    }
}
