//! The runtime context shared by every handler: the database pool, the
//! webhook dispatcher, the broadcast hub, ingestion throttles, and the
//! JWT codec (§9 "the runtime context is a plain object, instantiable
//! fresh for tests").

use std::sync::Arc;

use axum::extract::FromRef;
use webmacs_data::PgClient;
use webmacs_webhook::Dispatcher;

use crate::auth::JwtCodec;
use crate::broadcast::BroadcastHub;
use crate::config::ServerConfig;
use crate::ingest::IngestThrottles;

/// Everything an `axum` handler needs, cloned cheaply per request (every
/// field is an `Arc` or a `Clone`-cheap handle).
#[derive(Clone)]
pub struct AppState {
    pub pg: PgClient,
    pub dispatcher: Dispatcher,
    pub broadcast: Arc<BroadcastHub>,
    pub throttles: Arc<IngestThrottles>,
    pub jwt: JwtCodec,
    pub config: Arc<ServerConfig>,
    /// When this instance came up, for `/health`'s `uptime_seconds` (§6).
    pub started_at: std::time::Instant,
    /// Fired once at graceful shutdown so every persistent channel handler
    /// (§4.G) can close its socket instead of being dropped mid-flight.
    pub shutdown: tokio::sync::broadcast::Sender<()>,
}

impl AppState {
    pub fn new(pg: PgClient, dispatcher: Dispatcher, config: ServerConfig) -> Self {
        let jwt = JwtCodec::new(&config.secret_key);
        let (shutdown, _) = tokio::sync::broadcast::channel(1);
        Self {
            pg,
            dispatcher,
            broadcast: Arc::new(BroadcastHub::new()),
            throttles: Arc::new(IngestThrottles::default()),
            jwt,
            config: Arc::new(config),
            started_at: std::time::Instant::now(),
            shutdown,
        }
    }
}

impl FromRef<AppState> for PgClient {
    fn from_ref(state: &AppState) -> Self {
        state.pg.clone()
    }
}

impl FromRef<AppState> for Dispatcher {
    fn from_ref(state: &AppState) -> Self {
        state.dispatcher.clone()
    }
}

impl FromRef<AppState> for Arc<BroadcastHub> {
    fn from_ref(state: &AppState) -> Self {
        state.broadcast.clone()
    }
}

impl FromRef<AppState> for JwtCodec {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
