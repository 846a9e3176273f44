//! HTTP transport for webhook delivery.

mod client;
mod config;

pub use client::WebhookClient;
pub use config::{DeliveryConfig, BACKOFF_BASE, DEFAULT_TIMEOUT_SECS, MAX_CONCURRENT_DELIVERIES, MAX_RETRIES};

/// Tracing target for webhook delivery.
pub const TRACING_TARGET: &str = "webmacs_webhook::reqwest";
