//! Error types for the persistence gateway (§4.B), and their mapping onto
//! the shared [`webmacs_core::ErrorKind`] taxonomy (§4.A).

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, Error as DieselError};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;
use webmacs_core::ErrorKind;

use crate::types::constraint::ConstraintViolation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the persistence gateway.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database operation timed out")]
    Timeout(TimeoutType),

    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database migration error: {0}")]
    Migration(BoxError),

    #[error("database query error: {0}")]
    Query(#[from] DieselError),

    #[error("not found")]
    NotFound,

    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(err) = self else {
            return None;
        };
        let DieselError::DatabaseError(_, info) = err else {
            return None;
        };
        info.constraint_name()
    }

    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }

    /// Maps this gateway error onto the closed core taxonomy. A unique
    /// constraint violation becomes [`ErrorKind::Conflict`]; a missing row
    /// becomes [`ErrorKind::NotFound`]; everything else that looks
    /// retryable becomes [`ErrorKind::Transient`].
    pub fn into_core(self) -> webmacs_core::Error {
        if let Some(violation) = self.constraint_violation() {
            return ErrorKind::Conflict
                .with_context(format!("duplicate value violates {violation}"))
                .with_source(self);
        }
        match &self {
            PgError::NotFound => ErrorKind::NotFound.with_context("resource not found"),
            PgError::Query(DieselError::NotFound) => {
                ErrorKind::NotFound.with_context("resource not found")
            }
            _ if self.is_transient() => {
                ErrorKind::Transient.with_context("database temporarily unavailable")
            }
            _ => ErrorKind::Transient.with_context(self.to_string()),
        }
        .with_source(self)
    }
}

impl From<DeadpoolError> for PgError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!("unexpected post-create hook error: {err}");
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!("no tokio runtime specified for connection pool");
                Self::Unexpected("no runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "connection pool is closed".into(),
            )),
        }
    }
}

pub type PgResult<T, E = PgError> = Result<T, E>;
