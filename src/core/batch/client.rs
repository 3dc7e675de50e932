//! Transformation client
//!
//! Wraps one [`ImageTransformer`] call with a hard deadline and classifies
//! whatever comes back into an [`ItemOutcome`]. Never returns an error.

use super::types::ItemOutcome;
use crate::auth::Credential;
use crate::core::encoder::EncodedImage;
use crate::core::traits::{ImageTransformer, TransformFailure};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Status reported for connection-level failures
const NETWORK_FAILURE_STATUS: u16 = 502;

/// Single-attempt, deadline-bounded upstream caller
#[derive(Clone)]
pub struct TransformationClient {
    transformer: Arc<dyn ImageTransformer>,
    /// Retry hint used when a 429 body carries none
    default_retry_after_secs: u64,
}

impl TransformationClient {
    pub fn new(transformer: Arc<dyn ImageTransformer>, default_retry_after_secs: u64) -> Self {
        Self {
            transformer,
            default_retry_after_secs,
        }
    }

    pub fn transformer(&self) -> &Arc<dyn ImageTransformer> {
        &self.transformer
    }

    /// Issue exactly one upstream call for the item at `position`.
    ///
    /// The in-flight request is dropped when `deadline` expires.
    pub async fn call(
        &self,
        position: usize,
        credential: &Credential,
        image: &EncodedImage,
        instruction: &str,
        deadline: Duration,
    ) -> ItemOutcome {
        debug!(
            position,
            media_type = %image.media_type,
            size = image.bytes.len(),
            provider = self.transformer.name(),
            "Dispatching item"
        );

        let result = tokio::time::timeout(
            deadline,
            self.transformer.transform(credential, image, instruction),
        )
        .await;

        let outcome = match result {
            Ok(Ok(image)) => ItemOutcome::Success { position, image },
            Ok(Err(failure)) => self.classify(position, failure),
            Err(_) => ItemOutcome::Timeout {
                position,
                detail: format!("no response within {}s", deadline.as_secs_f32()),
            },
        };

        if let Some(detail) = outcome.detail() {
            warn!(position, outcome = outcome.kind(), detail, "Item failed");
        } else {
            debug!(position, "Item succeeded");
        }
        outcome
    }

    fn classify(&self, position: usize, failure: TransformFailure) -> ItemOutcome {
        match failure {
            TransformFailure::Upstream { status, detail } => ItemOutcome::UpstreamError {
                position,
                status,
                detail,
            },
            TransformFailure::RateLimited {
                detail,
                retry_after,
            } => ItemOutcome::RateLimited {
                position,
                detail,
                retry_after_secs: retry_after.unwrap_or(self.default_retry_after_secs),
            },
            TransformFailure::Timeout(detail) => ItemOutcome::Timeout { position, detail },
            TransformFailure::Malformed(detail) => ItemOutcome::malformed(position, detail),
            TransformFailure::Network(detail) => ItemOutcome::UpstreamError {
                position,
                status: NETWORK_FAILURE_STATUS,
                detail,
            },
        }
    }
}
