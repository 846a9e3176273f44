//! Request extractors.

mod bearer_auth;
mod pg_connection;

pub use bearer_auth::AuthUser;
pub use pg_connection::PgPool;
