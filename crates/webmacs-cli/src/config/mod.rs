//! CLI configuration hierarchy: network binding, database, webhook
//! delivery, and the rest of the server's own settings, all gathered
//! behind one `clap::Parser` (§4.J).
//!
//! ```text
//! Cli
//! ├── net: NetConfig          # host, port, shutdown timeout
//! ├── pg: PgConfig            # database URL, pool size
//! ├── webhook: DeliveryConfig # per-delivery timeout, retries, concurrency
//! └── server: ServerConfig    # auth, CORS, OTA, plugin/storage paths
//! ```

mod net;

pub use net::NetConfig;

use clap::Parser;
use serde::{Deserialize, Serialize};
use webmacs_data::PgConfig;
use webmacs_server::config::ServerConfig;
use webmacs_webhook::DeliveryConfig;

use crate::telemetry::LogFormat;

/// Complete CLI configuration, assembled from CLI arguments, environment
/// variables, and (optionally) a local `.env` file.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "webmacs")]
#[command(about = "WebMACS IoT monitoring-and-control backplane server")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub net: NetConfig,

    #[clap(flatten)]
    pub pg: PgConfig,

    #[clap(flatten)]
    pub webhook: DeliveryConfig,

    #[clap(flatten)]
    pub server: ServerConfig,

    /// Deployment environment; `production` tightens `secret_key`
    /// validation (§6).
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    #[serde(default = "default_environment")]
    pub environment: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "fmt")]
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Cli {
    /// Loads a `.env` file if present (missing is not an error), then
    /// parses CLI arguments and environment variables.
    pub fn load() -> Self {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("warning: failed to load .env file: {err}");
        }
        Self::parse()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Runs every sub-config's own validation (§6).
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate(self.is_production()).map_err(anyhow::Error::msg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_only_required_arguments() {
        let cli = Cli::parse_from(["webmacs", "--database-url", "postgres://localhost/webmacs", "--secret-key", "dev-secret"]);
        assert_eq!(cli.pg.database_url, "postgres://localhost/webmacs");
        assert!(!cli.is_production());
    }

    #[test]
    fn production_environment_is_case_insensitive() {
        let cli = Cli::parse_from([
            "webmacs",
            "--database-url",
            "postgres://localhost/webmacs",
            "--secret-key",
            "dev-secret",
            "--environment",
            "PRODUCTION",
        ]);
        assert!(cli.is_production());
    }

    #[test]
    fn validate_rejects_short_secret_in_production() {
        let cli = Cli::parse_from([
            "webmacs",
            "--database-url",
            "postgres://localhost/webmacs",
            "--secret-key",
            "short",
            "--environment",
            "production",
        ]);
        assert!(cli.validate().is_err());
    }
}
