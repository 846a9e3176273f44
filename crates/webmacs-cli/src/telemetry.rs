//! Tracing subscriber setup: `RUST_LOG`-driven filtering, switchable between
//! human-readable and JSON formatting (§4.J).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output formats selectable via `--log-format`/`LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for local development.
    Fmt,
    /// Newline-delimited JSON, for log aggregation in production.
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Fmt
    }
}

/// Initializes the global tracing subscriber. Must be called once, before
/// any `tracing::` call.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Fmt => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}
