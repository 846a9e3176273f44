//! Server configuration (§6 environment variables).

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Minimum length required for `secret_key` in a production deployment
/// (§6). Shorter keys are accepted at construction time but rejected by
/// [`ServerConfig::validate`], which the CLI bootstrap calls before serving.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Default JWT/API-token lifetime, in hours (§6: "default TTL 24h").
const DEFAULT_ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Server-wide configuration, covering auth, CORS, OIDC, firmware/plugin
/// storage paths, and rate limiting (§6).
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ServerConfig {
    /// HMAC signing key for issued JWTs. Must be at least
    /// [`MIN_PRODUCTION_SECRET_LEN`] bytes outside of local development.
    #[cfg_attr(feature = "config", arg(long = "secret-key", env = "SECRET_KEY"))]
    pub secret_key: String,

    #[cfg_attr(
        feature = "config",
        arg(long = "access-token-expire-hours", env = "ACCESS_TOKEN_EXPIRE_HOURS", default_value_t = DEFAULT_ACCESS_TOKEN_TTL_HOURS)
    )]
    #[serde(default = "default_access_token_ttl_hours")]
    pub access_token_expire_hours: i64,

    #[cfg_attr(
        feature = "config",
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[cfg_attr(feature = "config", arg(long = "initial-admin-email", env = "INITIAL_ADMIN_EMAIL"))]
    pub initial_admin_email: Option<String>,

    #[cfg_attr(
        feature = "config",
        arg(long = "initial-admin-password", env = "INITIAL_ADMIN_PASSWORD")
    )]
    pub initial_admin_password: Option<String>,

    /// OIDC fields below are accepted and validated for shape but drive no
    /// behavior in this core; the OIDC-consuming middleware is an external
    /// collaborator (§4.J, §1).
    #[cfg_attr(feature = "config", arg(long = "oidc-issuer-url", env = "OIDC_ISSUER_URL"))]
    pub oidc_issuer_url: Option<String>,
    #[cfg_attr(feature = "config", arg(long = "oidc-client-id", env = "OIDC_CLIENT_ID"))]
    pub oidc_client_id: Option<String>,
    #[cfg_attr(feature = "config", arg(long = "oidc-client-secret", env = "OIDC_CLIENT_SECRET"))]
    pub oidc_client_secret: Option<String>,
    #[cfg_attr(feature = "config", arg(long = "oidc-redirect-uri", env = "OIDC_REDIRECT_URI"))]
    pub oidc_redirect_uri: Option<String>,
    #[cfg_attr(feature = "config", arg(long = "oidc-scope", env = "OIDC_SCOPE", default_value = "openid profile email"))]
    #[serde(default = "default_oidc_scope")]
    pub oidc_scope: String,
    #[cfg_attr(feature = "config", arg(long = "oidc-provider-name", env = "OIDC_PROVIDER_NAME"))]
    pub oidc_provider_name: Option<String>,
    #[cfg_attr(feature = "config", arg(long = "oidc-auto-create", env = "OIDC_AUTO_CREATE"))]
    #[serde(default)]
    pub oidc_auto_create: bool,
    #[cfg_attr(feature = "config", arg(long = "oidc-default-role", env = "OIDC_DEFAULT_ROLE", default_value = "viewer"))]
    #[serde(default = "default_oidc_role")]
    pub oidc_default_role: String,
    #[cfg_attr(feature = "config", arg(long = "frontend-url", env = "FRONTEND_URL"))]
    pub frontend_url: Option<String>,

    #[cfg_attr(
        feature = "config",
        arg(long = "rate-limit-per-minute", env = "RATE_LIMIT_PER_MINUTE", default_value_t = 120)
    )]
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    #[cfg_attr(
        feature = "config",
        arg(long = "storage-backend", env = "STORAGE_BACKEND", default_value = "local")
    )]
    #[serde(default = "default_storage_backend")]
    pub storage_backend: String,

    #[cfg_attr(
        feature = "config",
        arg(long = "firmware-dir", env = "FIRMWARE_DIR", default_value = "./data/firmware")
    )]
    #[serde(default = "default_firmware_dir")]
    pub firmware_dir: String,

    #[cfg_attr(
        feature = "config",
        arg(long = "plugin-dir", env = "PLUGIN_DIR", default_value = "./data/plugins")
    )]
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: String,

    #[cfg_attr(
        feature = "config",
        arg(long = "timezone", env = "TIMEZONE", default_value = "UTC")
    )]
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// The version this running server reports via `/ota/check` and
    /// `/health` (§6).
    #[cfg_attr(
        feature = "config",
        arg(long = "firmware-version", env = "FIRMWARE_VERSION", default_value = "0.0.0")
    )]
    #[serde(default = "default_firmware_version")]
    pub firmware_version: String,

    /// `owner/repo` of the GitHub releases index checked for a newer
    /// firmware build (§4.H update discovery). Empty disables the remote
    /// check; local candidates still apply.
    #[cfg_attr(feature = "config", arg(long = "github-owner", env = "GITHUB_OWNER", default_value = ""))]
    #[serde(default)]
    pub github_owner: String,
    #[cfg_attr(feature = "config", arg(long = "github-repo", env = "GITHUB_REPO", default_value = ""))]
    #[serde(default)]
    pub github_repo: String,
}

fn default_access_token_ttl_hours() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL_HOURS
}
fn default_rate_limit() -> u32 {
    120
}
fn default_storage_backend() -> String {
    "local".to_string()
}
fn default_firmware_dir() -> String {
    "./data/firmware".to_string()
}
fn default_plugin_dir() -> String {
    "./data/plugins".to_string()
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_firmware_version() -> String {
    "0.0.0".to_string()
}
fn default_oidc_scope() -> String {
    "openid profile email".to_string()
}
fn default_oidc_role() -> String {
    "viewer".to_string()
}

impl ServerConfig {
    pub fn access_token_ttl(&self) -> jiff::SignedDuration {
        jiff::SignedDuration::from_hours(self.access_token_expire_hours)
    }

    /// Rejects a `secret_key` shorter than [`MIN_PRODUCTION_SECRET_LEN`]
    /// when `production` is true (§6). Development deployments may use a
    /// shorter key so local bootstrapping doesn't require generating one.
    pub fn validate(&self, production: bool) -> Result<(), String> {
        if production && self.secret_key.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(format!(
                "secret_key must be at least {MIN_PRODUCTION_SECRET_LEN} characters in production"
            ));
        }
        Ok(())
    }

    /// Whether a GitHub releases index is configured for remote update
    /// discovery (§4.H).
    pub fn has_github_target(&self) -> bool {
        !self.github_owner.is_empty() && !self.github_repo.is_empty()
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("secret_key", &"***")
            .field("oidc_client_secret", &self.oidc_client_secret.as_ref().map(|_| "***"))
            .field("access_token_expire_hours", &self.access_token_expire_hours)
            .field("cors_origins", &self.cors_origins)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("storage_backend", &self.storage_backend)
            .field("firmware_dir", &self.firmware_dir)
            .field("plugin_dir", &self.plugin_dir)
            .field("timezone", &self.timezone)
            .field("firmware_version", &self.firmware_version)
            .field("github_owner", &self.github_owner)
            .field("github_repo", &self.github_repo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret_len: usize) -> ServerConfig {
        ServerConfig {
            secret_key: "a".repeat(secret_len),
            access_token_expire_hours: DEFAULT_ACCESS_TOKEN_TTL_HOURS,
            cors_origins: vec![],
            initial_admin_email: None,
            initial_admin_password: None,
            oidc_issuer_url: None,
            oidc_client_id: None,
            oidc_client_secret: None,
            oidc_redirect_uri: None,
            oidc_scope: default_oidc_scope(),
            oidc_provider_name: None,
            oidc_auto_create: false,
            oidc_default_role: default_oidc_role(),
            frontend_url: None,
            rate_limit_per_minute: 120,
            storage_backend: "local".to_string(),
            firmware_dir: "./data/firmware".to_string(),
            plugin_dir: "./data/plugins".to_string(),
            timezone: "UTC".to_string(),
            firmware_version: "1.0.0".to_string(),
            github_owner: String::new(),
            github_repo: String::new(),
        }
    }

    #[test]
    fn short_secret_rejected_in_production() {
        assert!(config(8).validate(true).is_err());
    }

    #[test]
    fn short_secret_allowed_outside_production() {
        assert!(config(8).validate(false).is_ok());
    }

    #[test]
    fn thirty_two_char_secret_passes_in_production() {
        assert!(config(32).validate(true).is_ok());
    }
}
