//! Binding, graceful shutdown, and background-task supervision (§4.J).
//!
//! Shutdown runs in four steps once a signal arrives: stop accepting new
//! connections (axum's graceful shutdown does this for us), close the
//! database pool, tell every attached WebSocket connection to close, then
//! wait for the janitor and any other supervised task to finish, bounded by
//! `shutdown_timeout`.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;
use tokio::task::JoinSet;
use webmacs_server::state::AppState;

use crate::config::NetConfig;

const TRACING_TARGET: &str = "webmacs_cli::server";

/// Resolves once SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            tracing::error!(target: TRACING_TARGET, error = %err, "failed to install Ctrl+C handler");
        } else {
            tracing::info!(target: TRACING_TARGET, "received Ctrl+C, starting graceful shutdown");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(target: TRACING_TARGET, "received SIGTERM, starting graceful shutdown");
            }
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Binds `net` and serves `app` until a shutdown signal arrives, then drains
/// `state`'s database pool, broadcast hub, and `background_tasks` within
/// `net.shutdown_timeout()`.
pub async fn serve(
    app: axum::Router,
    net: &NetConfig,
    state: AppState,
    mut background_tasks: JoinSet<()>,
) -> anyhow::Result<()> {
    let addr = net.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: TRACING_TARGET, %addr, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!(target: TRACING_TARGET, "stopped accepting new connections, draining");
    drain(state, &mut background_tasks, net.shutdown_timeout()).await;

    Ok(())
}

async fn drain(state: AppState, background_tasks: &mut JoinSet<()>, timeout: Duration) {
    state.pg.close();

    let _ = state.shutdown.send(());
    tracing::info!(target: TRACING_TARGET, "closed database pool, notified attached channels");

    let drain_tasks = async {
        while background_tasks.join_next().await.is_some() {}
    };

    if tokio::time::timeout(timeout, drain_tasks).await.is_err() {
        tracing::warn!(
            target: TRACING_TARGET,
            timeout_secs = timeout.as_secs(),
            "background tasks did not drain before the shutdown timeout; aborting the rest"
        );
        background_tasks.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_completes_when_tasks_finish_quickly() {
        let pg = webmacs_data::PgClient::new(webmacs_data::PgConfig {
            database_url: "postgres://localhost/does-not-need-to-connect".to_string(),
            max_connections: 1,
            connection_timeout_secs: Some(1),
            idle_timeout_secs: None,
        })
        .expect("pool builds without connecting");
        let dispatcher = webmacs_webhook::Dispatcher::new(pg.clone(), webmacs_webhook::DeliveryConfig::default());
        let state = AppState::new(pg, dispatcher, test_server_config());

        let mut tasks = JoinSet::new();
        tasks.spawn(async {});

        drain(state, &mut tasks, Duration::from_secs(1)).await;
        assert!(tasks.is_empty());
    }

    fn test_server_config() -> webmacs_server::config::ServerConfig {
        webmacs_server::config::ServerConfig {
            secret_key: "test-secret-key-at-least-32-bytes-long".to_string(),
            access_token_expire_hours: 24,
            cors_origins: vec![],
            initial_admin_email: None,
            initial_admin_password: None,
            oidc_issuer_url: None,
            oidc_client_id: None,
            oidc_client_secret: None,
            oidc_redirect_uri: None,
            oidc_scope: "openid profile email".to_string(),
            oidc_provider_name: None,
            oidc_auto_create: false,
            oidc_default_role: "viewer".to_string(),
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
}
