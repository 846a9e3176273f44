#![forbid(unsafe_code)]

//! Command-line entry point: parses configuration, wires up the database
//! pool, webhook dispatcher, and router, runs one-time bootstrap, and serves
//! until a shutdown signal arrives (§4.J).

mod bootstrap;
mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use tokio::task::JoinSet;
use webmacs_data::PgClient;
use webmacs_server::state::AppState;
use webmacs_webhook::Dispatcher;

use crate::config::Cli;

const TRACING_TARGET_STARTUP: &str = "webmacs_cli::startup";
const TRACING_TARGET_SHUTDOWN: &str = "webmacs_cli::shutdown";

/// Cadence of the blacklist-token janitor (§5): finer-grained than the
/// token's own retention window, coarse enough not to hammer the pool.
const BLACKLIST_JANITOR_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(target: TRACING_TARGET_SHUTDOWN, "shut down cleanly");
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(target: TRACING_TARGET_SHUTDOWN, error = %error, "terminated with error");
    } else {
        eprintln!("Error: {error:#}");
    }
    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::load();
    telemetry::init(cli.log_format);

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        environment = %cli.environment,
        addr = %cli.net.socket_addr(),
        "starting webmacs"
    );

    cli.validate().context("invalid configuration")?;
    if cli.net.binds_to_all_interfaces() {
        tracing::warn!(target: TRACING_TARGET_STARTUP, "bound to all interfaces; ensure firewall rules are in place");
    }

    let pg = PgClient::new(cli.pg.clone()).context("failed to build database pool")?;
    pg.check_connectivity().await.context("database connectivity check failed")?;

    let dispatcher = Dispatcher::new(pg.clone(), cli.webhook.clone());
    let state = AppState::new(pg.clone(), dispatcher, cli.server.clone());

    bootstrap::seed_initial_admin(&pg, &cli.server).await.context("initial admin seeding failed")?;

    let mut background_tasks = JoinSet::new();
    let janitor = bootstrap::spawn_blacklist_janitor(pg.clone(), cli.server.access_token_ttl(), BLACKLIST_JANITOR_INTERVAL);
    background_tasks.spawn(async move {
        let _ = janitor.await;
    });

    let router = webmacs_server::build_router(state.clone());

    server::serve(router, &cli.net, state, background_tasks).await.context("server error")?;

    Ok(())
}
