//! Look dispatcher
//!
//! Inbound entry point for batches. Every batch-level check happens here,
//! in order, before any item reaches the upstream service:
//! authenticate, validate, resolve the credential, then schedule.

use crate::auth::{
    CredentialResolver, Identity, IdentityProvider, JwtIdentityProvider,
    secret_store_from_config,
};
use crate::config::Config;
use crate::core::batch::{
    BatchOutcome, BatchRequest, BatchScheduler, ItemInput, SchedulerConfig, TransformationClient,
};
use crate::core::instruction::TransformSpec;
use crate::core::providers::transformer_from_config;
use crate::core::traits::{ImageTransformer, TransformFailure};
use crate::utils::error::{GatewayError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Authenticated, validated access to the batch engine
#[derive(Clone)]
pub struct LookDispatcher {
    identity: Arc<dyn IdentityProvider>,
    resolver: CredentialResolver,
    scheduler: BatchScheduler,
    max_items: usize,
}

impl LookDispatcher {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        resolver: CredentialResolver,
        scheduler: BatchScheduler,
        max_items: usize,
    ) -> Self {
        Self {
            identity,
            resolver,
            scheduler,
            max_items,
        }
    }

    /// Wire the production collaborators from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let transformer = transformer_from_config(config.gemini())?;
        Self::with_transformer(config, transformer)
    }

    /// Like [`LookDispatcher::from_config`] with a caller-supplied upstream
    pub fn with_transformer(
        config: &Config,
        transformer: Arc<dyn ImageTransformer>,
    ) -> Result<Self> {
        let batch = config.batch();
        let identity = Arc::new(JwtIdentityProvider::new(config.auth()));
        let resolver = CredentialResolver::new(secret_store_from_config(config.secrets())?);
        let client = TransformationClient::new(transformer, batch.rate_limit_retry_after_secs);
        let scheduler = BatchScheduler::new(client, SchedulerConfig::from(batch));

        Ok(Self::new(identity, resolver, scheduler, batch.max_items))
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }

    /// Verify the caller's bearer token
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<Identity> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GatewayError::unauthorized("Missing access token"))?;
        self.identity.verify(token).await
    }

    /// Run one batch for the caller identified by `bearer`.
    ///
    /// Returns an error only when the batch is rejected before dispatch or
    /// the credential could not be looked up. Item failures are part of the
    /// returned outcome.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn submit_batch(
        &self,
        bearer: Option<&str>,
        items: Vec<ItemInput>,
        spec: Option<&str>,
    ) -> Result<BatchOutcome> {
        let identity = self.authenticate(bearer).await?;
        self.submit_for(identity, items, spec).await
    }

    /// Run one batch for an identity already returned by [`LookDispatcher::authenticate`]
    #[instrument(skip_all, fields(user_id = %identity.user_id, items = items.len()))]
    pub async fn submit_for(
        &self,
        identity: Identity,
        items: Vec<ItemInput>,
        spec: Option<&str>,
    ) -> Result<BatchOutcome> {
        let spec = self.validate(&items, spec)?;
        let credential = self.resolver.resolve(&identity).await?;

        info!(user_id = %identity.user_id, spec = %spec, "Batch accepted");
        let request = BatchRequest::new(identity, spec, items);
        Ok(self.scheduler.run(request, &credential).await)
    }

    /// Forward a raw `generateContent` payload with the caller's credential.
    ///
    /// Bounded by the same deadline as a single batch item.
    #[instrument(skip_all)]
    pub async fn forward(&self, bearer: Option<&str>, body: Value) -> Result<Value> {
        let identity = self.authenticate(bearer).await?;
        let credential = self.resolver.resolve(&identity).await?;
        let deadline = self.scheduler.config().item_timeout;

        let call = self
            .scheduler
            .client()
            .transformer()
            .forward(&credential, body);
        match tokio::time::timeout(deadline, call).await {
            Ok(result) => result.map_err(upstream_error),
            Err(_) => {
                warn!(deadline_secs = deadline.as_secs_f32(), "Passthrough timed out");
                Err(upstream_error(TransformFailure::Timeout(format!(
                    "no response within {}s",
                    deadline.as_secs_f32()
                ))))
            }
        }
    }

    fn validate(&self, items: &[ItemInput], spec: Option<&str>) -> Result<TransformSpec> {
        if items.is_empty() {
            return Err(GatewayError::validation("No outfit images provided"));
        }
        if items.len() > self.max_items {
            return Err(GatewayError::validation(format!(
                "Too many images: {} provided, at most {} allowed",
                items.len(),
                self.max_items
            )));
        }
        match spec.map(str::trim).filter(|s| !s.is_empty()) {
            Some(label) => Ok(TransformSpec::parse(label)),
            None => Err(GatewayError::validation("Body type is required")),
        }
    }
}

fn upstream_error(failure: TransformFailure) -> GatewayError {
    let status = match &failure {
        TransformFailure::Upstream { status, .. } => *status,
        TransformFailure::RateLimited { .. } => 429,
        TransformFailure::Timeout(_) => 504,
        TransformFailure::Malformed(_) | TransformFailure::Network(_) => 502,
    };
    GatewayError::Upstream {
        status,
        message: failure.to_string(),
    }
}
