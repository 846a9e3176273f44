//! Connection pool and its configuration (§4.B).

mod pg_client;
mod pg_config;

pub use pg_client::{ConnectionPool, PgClient, PgConn, PgPoolStatus};
pub use pg_config::PgConfig;
