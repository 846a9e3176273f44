//! HTTP boundary error mapping (§7): every handler returns
//! [`webmacs_core::Result`]; this module is the only place in the workspace
//! that turns an [`ErrorKind`] into a status code and a response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use webmacs_core::{Error, ErrorKind};

pub type Result<T> = std::result::Result<T, HttpError>;

/// Thin wrapper so the orphan rule lets us implement [`IntoResponse`] for a
/// foreign error type.
pub struct HttpError(pub Error);

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<webmacs_data::PgError> for HttpError {
    fn from(err: webmacs_data::PgError) -> Self {
        Self(err.into_core())
    }
}

/// Exact wire shape from §7: `{"detail": "<message>"}`, nothing else. No
/// stack trace, source chain, or internal kind name crosses this boundary.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = self.0.logged();
        let status =
            StatusCode::from_u16(err.kind().http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody { detail: err.message() })).into_response()
    }
}

/// Helper for handlers that need to fail with a kind/message pair directly,
/// without an intermediate [`Error`] (e.g. request validation).
pub fn reject(kind: ErrorKind, message: impl Into<String>) -> HttpError {
    HttpError(kind.with_context(message))
}
