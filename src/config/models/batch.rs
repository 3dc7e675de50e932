//! Batch scheduling configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Concurrency, pacing and deadline settings for one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum item calls in flight at once (group size)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Pause between consecutive groups, in milliseconds
    #[serde(default = "default_group_delay_ms")]
    pub group_delay_ms: u64,
    /// Hard deadline for a single upstream call, in seconds
    #[serde(default = "default_item_timeout_secs")]
    pub item_timeout_secs: u64,
    /// Largest accepted batch
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Wait hint returned to callers when the upstream rate-limits an item
    #[serde(default = "default_retry_after_secs")]
    pub rate_limit_retry_after_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            group_delay_ms: default_group_delay_ms(),
            item_timeout_secs: default_item_timeout_secs(),
            max_items: default_max_items(),
            rate_limit_retry_after_secs: default_retry_after_secs(),
        }
    }
}

impl BatchConfig {
    pub fn group_delay(&self) -> Duration {
        Duration::from_millis(self.group_delay_ms)
    }

    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }

    /// Validate batch configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("Batch concurrency cannot be 0".to_string());
        }
        if self.item_timeout_secs == 0 {
            return Err("Item timeout cannot be 0".to_string());
        }
        if self.max_items == 0 {
            return Err("Max items cannot be 0".to_string());
        }
        Ok(())
    }
}
