//! The closed error taxonomy shared by every component of the core.
//!
//! Every fallible operation in the workspace returns [`Result<T>`], built
//! from one of the eight [`ErrorKind`] variants. The HTTP boundary in
//! `webmacs-server` is the only place that maps a kind to a status code;
//! every other caller matches on the kind directly.

use std::fmt;

use crate::TRACING_TARGET_ERROR;

/// A closed set of error kinds, each mapping to exactly one HTTP status at
/// the boundary (see the table in the root specification, §4.A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Resource with the given `public_id` does not exist.
    NotFound,
    /// Uniqueness violation (duplicate name/url/version).
    Conflict,
    /// Schema or cross-field validation failed.
    InvalidInput,
    /// Missing, invalid, or expired credential.
    Unauthorized,
    /// Credential valid but lacks the required role.
    Forbidden,
    /// State-machine transition not permitted from the current state.
    InvalidTransition,
    /// An external dependency (identity provider, remote fetch) failed.
    DependencyFailure,
    /// Temporary condition; a retry may succeed.
    Transient,
}

impl ErrorKind {
    /// Returns the conventional HTTP status code for this kind.
    pub const fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InvalidInput => 422,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::InvalidTransition => 409,
            ErrorKind::DependencyFailure => 502,
            ErrorKind::Transient => 503,
        }
    }

    /// Whether an operation that failed with this kind is worth retrying.
    pub const fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Transient | ErrorKind::DependencyFailure)
    }

    /// Builds an [`Error`] of this kind with a human-readable message.
    pub fn with_context(self, message: impl Into<String>) -> Error {
        Error {
            kind: self,
            message: message.into(),
            source: None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::DependencyFailure => "dependency_failure",
            ErrorKind::Transient => "transient",
        };
        f.write_str(name)
    }
}

/// The error type propagated across component boundaries in the core.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Constructs an error directly from a kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error, returning the modified value.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message; this is what the HTTP boundary surfaces
    /// verbatim in the `{"detail": ...}` response body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convenience: true if this error's kind is worth retrying.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Logs this error at an appropriate level for its kind and returns it
    /// unchanged, for use in `.inspect_err` / `map_err` chains at
    /// boundaries that want to record the failure without changing control
    /// flow.
    pub fn logged(self) -> Self {
        match self.kind {
            ErrorKind::NotFound | ErrorKind::InvalidInput | ErrorKind::Conflict => {
                tracing::debug!(target: TRACING_TARGET_ERROR, kind = %self.kind, message = %self.message, "request error");
            }
            ErrorKind::Unauthorized | ErrorKind::Forbidden => {
                tracing::warn!(target: TRACING_TARGET_ERROR, kind = %self.kind, message = %self.message, "auth error");
            }
            _ => {
                tracing::error!(target: TRACING_TARGET_ERROR, kind = %self.kind, message = %self.message, "internal error");
            }
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// The result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
