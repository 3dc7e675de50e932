//! # looks-gateway
//!
//! Batch image-transformation gateway. A caller submits a few outfit photos
//! and one size class; each photo is sent to Gemini's image model with a
//! restyling instruction and the per-photo results come back in order.
//!
//! ## Features
//!
//! - **Bounded concurrency**: photos run in groups of at most K upstream calls
//! - **Pacing**: a fixed pause between groups keeps under upstream rate limits
//! - **Isolation**: a failed, rate-limited or timed-out photo never sinks the rest
//! - **Per-user keys**: each caller's own API key, looked up once per batch
//!
//! ## Library use
//!
//! ```rust,no_run
//! use looks_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use auth::{Credential, Identity};
pub use core::batch::{
    BatchOutcome, BatchRequest, BatchScheduler, BatchState, GeneratedImage, ItemInput,
    ItemOutcome, SchedulerConfig, TransformationClient,
};
pub use core::instruction::{TransformSpec, build_instruction};
pub use core::traits::{ImageTransformer, TransformFailure};
pub use services::LookDispatcher;

use tracing::info;

/// Configured gateway, ready to serve
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(&config).await?;
        Ok(Self { config, server })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting looks-gateway");
        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build metadata captured by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
