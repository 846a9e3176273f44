//! Shared, dependency-light types used across the WebMACS ingestion core.
//!
//! This crate carries no I/O dependencies: it exists so the error taxonomy
//! (§4.A) and health-report shape are defined exactly once and consumed by
//! every other crate in the workspace without creating a dependency cycle.

pub mod error;
pub mod health;
pub mod request_id;

pub use error::{Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use request_id::RequestId;

/// Tracing target for error-boundary logging.
pub const TRACING_TARGET_ERROR: &str = "webmacs_core::error";
