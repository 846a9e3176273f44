//! Persistence gateway (§4.B): connection pool, Diesel schema, models, and
//! the repository layer the rest of the workspace talks to.

pub mod client;
pub mod error;
pub mod model;
pub mod query;
pub mod schema;
pub mod types;

pub use client::{ConnectionPool, PgClient, PgConfig, PgConn, PgPoolStatus};
pub use error::{PgError, PgResult};

/// Tracing target for connection-pool lifecycle events.
pub const TRACING_TARGET_CONNECTION: &str = "webmacs_data::client";
/// Tracing target for repository-level query events.
pub const TRACING_TARGET_QUERY: &str = "webmacs_data::query";
