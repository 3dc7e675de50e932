//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod auth;
pub mod batch;
pub mod gateway;
pub mod provider;
pub mod secrets;
pub mod server;

// Re-export all configuration types
pub use auth::*;
pub use batch::*;
pub use gateway::*;
pub use provider::*;
pub use secrets::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes (six photos plus form overhead)
pub fn default_max_body_size() -> usize {
    64 * 1024 * 1024
}

pub fn default_concurrency() -> usize {
    2
}

pub fn default_group_delay_ms() -> u64 {
    2000
}

pub fn default_item_timeout_secs() -> u64 {
    50
}

pub fn default_max_items() -> usize {
    6
}

pub fn default_retry_after_secs() -> u64 {
    10
}

pub fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_gemini_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

pub fn default_connect_timeout_secs() -> u64 {
    10
}

pub fn default_jwt_audience() -> Option<String> {
    Some("authenticated".to_string())
}

pub fn default_jwt_leeway_secs() -> u64 {
    30
}

pub fn default_settings_table() -> String {
    "user_settings".to_string()
}

pub fn default_settings_column() -> String {
    "nano_bonana_api_key".to_string()
}

pub fn default_user_column() -> String {
    "user_id".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
