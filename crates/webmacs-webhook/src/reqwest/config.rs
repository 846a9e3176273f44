//! Delivery configuration (§4.D).

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Per-request HTTP timeout (§4.D: "a per-request timeout of 10 seconds").
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Attempts per delivery before giving up and marking `dead_letter`.
pub const MAX_RETRIES: u32 = 5;
/// Exponential backoff base: `BACKOFF_BASE^attempt` seconds between tries.
pub const BACKOFF_BASE: u64 = 2;
/// Shared semaphore size bounding concurrent in-flight deliveries (§5).
pub const MAX_CONCURRENT_DELIVERIES: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct DeliveryConfig {
    #[cfg_attr(
        feature = "config",
        arg(long = "webhook-timeout-secs", env = "WEBHOOK_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[cfg_attr(
        feature = "config",
        arg(long = "webhook-max-retries", env = "WEBHOOK_MAX_RETRIES", default_value_t = MAX_RETRIES)
    )]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "webhook-max-concurrent-deliveries",
            env = "WEBHOOK_MAX_CONCURRENT_DELIVERIES",
            default_value_t = MAX_CONCURRENT_DELIVERIES
        )
    )]
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_deliveries: usize,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    MAX_RETRIES
}

fn default_max_concurrent() -> usize {
    MAX_CONCURRENT_DELIVERIES
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: MAX_RETRIES,
            max_concurrent_deliveries: MAX_CONCURRENT_DELIVERIES,
        }
    }
}

impl DeliveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff wait before the given attempt number (1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(BACKOFF_BASE.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_constants() {
        let config = DeliveryConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_concurrent_deliveries, 16);
    }

    #[test]
    fn backoff_doubles_each_attempt() {
        let config = DeliveryConfig::default();
        assert_eq!(config.backoff(1), Duration::from_secs(2));
        assert_eq!(config.backoff(2), Duration::from_secs(4));
        assert_eq!(config.backoff(3), Duration::from_secs(8));
    }
}
