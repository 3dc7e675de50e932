//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::services::LookDispatcher;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every worker; all fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Batch entry point
    pub dispatcher: Arc<LookDispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: LookDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
