//! Error mapping for webhook delivery.

use thiserror::Error;
use webmacs_core::ErrorKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while signing or delivering a single webhook attempt.
#[derive(Debug, Error)]
pub enum Error {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("webhook subscription events blob could not be parsed")]
    InvalidEventsBlob,
}

impl Error {
    /// Whether this failure is worth retrying (§4.D: "on HTTP status >= 300
    /// or transport error").
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Request(_))
    }

    pub fn into_core(self) -> webmacs_core::Error {
        let kind = match &self {
            Error::Request(_) => ErrorKind::DependencyFailure,
            Error::Serialize(_) => ErrorKind::InvalidInput,
            Error::InvalidEventsBlob => ErrorKind::InvalidInput,
        };
        kind.with_context(self.to_string()).with_source(self)
    }
}
