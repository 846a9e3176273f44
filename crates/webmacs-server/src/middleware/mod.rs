//! Router-wide middleware: CORS and request-id propagation. Auth is
//! enforced per-handler via the [`crate::extract::AuthUser`] extractor
//! rather than a blanket layer, since `/health` and `/auth/login` must
//! stay unauthenticated.

pub mod body_limit;
pub mod cors;
pub mod request_id;
pub mod specification;

pub use specification::{OpenApiConfig, RouterOpenApiExt};
