//! Server builder and run_server function

use crate::config::Config;
use crate::core::traits::ImageTransformer;
use crate::server::server::HttpServer;
use crate::services::LookDispatcher;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    transformer: Option<Arc<dyn ImageTransformer>>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this upstream instead of the configured Gemini client
    pub fn with_transformer(mut self, transformer: Arc<dyn ImageTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        match self.transformer {
            Some(transformer) => {
                let dispatcher = LookDispatcher::with_transformer(&config, transformer)?;
                Ok(HttpServer::with_dispatcher(&config, dispatcher))
            }
            None => HttpServer::new(&config).await,
        }
    }
}

/// Build and run the server until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    let server = HttpServer::new(&config).await?;

    let batch = config.batch();
    info!(
        "Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!(
        concurrency = batch.concurrency,
        group_delay_ms = batch.group_delay_ms,
        item_timeout_secs = batch.item_timeout_secs,
        max_items = batch.max_items,
        "Batch policy"
    );
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /v1/looks - Batch look generation (multipart)");
    info!("   POST /v1/looks/single - Single look generation (JSON)");
    info!("   POST /v1/generate-content - Raw generateContent passthrough");

    server.start().await
}
