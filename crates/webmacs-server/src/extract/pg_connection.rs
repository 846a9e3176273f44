//! Database connection extractor for request handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use webmacs_data::{PgClient, PgConn};

use crate::error::HttpError;

/// Acquires a [`PgConn`] from the pool for the duration of one request.
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        let conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(error = %e, "failed to acquire database connection");
            HttpError(e.into_core())
        })?;

        Ok(PgPool(conn))
    }
}

impl aide::OperationInput for PgPool {}
