//! Connection pool and the two session abstractions from §4.B: a pooled
//! request connection, and a background connection used by the webhook
//! dispatcher, OTA downloads, and janitors.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use deadpool::managed::Pool;
use derive_more::{Deref, DerefMut};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::Object as PooledConnection;
use diesel_async::RunQueryDsl;

use crate::TRACING_TARGET_CONNECTION;
use crate::client::pg_config::PgConfig;
use crate::error::{PgError, PgResult};

pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Snapshot of pool utilization, surfaced by `/health` (§6).
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

impl PgPoolStatus {
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.size - self.available) as f64 / self.max_size as f64
        }
    }

    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// High-level database client: one connection pool shared by request
/// handlers and background work.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION, fields(database_url = %config.database_url_masked()))]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "initializing database client");

        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder(manager)
            .max_size(config.validated_max_connections() as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "failed to build connection pool");
                PgError::Unexpected(format!("failed to build connection pool: {e}").into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Like [`PgClient::new`] but also runs a `SELECT 1` connectivity
    /// check, matching the startup health-gate convention.
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION)]
    pub async fn new_with_test(config: PgConfig) -> PgResult<Self> {
        let this = Self::new(config)?;
        this.check_connectivity().await?;
        Ok(this)
    }

    /// Runs a `SELECT 1` against the pool; used both at startup and by the
    /// `/health` endpoint's database check (§6).
    pub async fn check_connectivity(&self) -> PgResult<()> {
        #[derive(diesel::QueryableByName)]
        struct ConnectivityTest {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            result: i32,
        }

        let mut conn = self.inner.pool.get().await.map_err(PgError::from)?;
        let _: ConnectivityTest = diesel::sql_query("SELECT 1 as result")
            .get_result(&mut *conn)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }

    /// A pooled connection for the lifetime of one request handler
    /// invocation (§4.B).
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = std::time::Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "failed to acquire connection");
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(target: TRACING_TARGET_CONNECTION, elapsed = ?elapsed, "connection acquisition took longer than expected");
        }

        Ok(PgConn::new(conn))
    }

    /// A connection for background work that outlives a request (webhook
    /// retries, OTA downloads, janitors) — same pool, distinct call site
    /// per §4.B's two-session-abstraction contract.
    pub async fn background_connection(&self) -> PgResult<PgConn> {
        self.get_connection().await
    }

    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }

    /// Marks the pool closed: in-flight connections finish normally, but any
    /// further `get()` fails immediately. Called once during graceful
    /// shutdown, after the listener stops accepting new connections.
    pub fn close(&self) {
        self.inner.pool.close();
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}

/// A pooled connection, dereferencing to [`AsyncPgConnection`] so
/// repository methods can be called directly on it.
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
