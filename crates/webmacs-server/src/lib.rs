#![forbid(unsafe_code)]

//! HTTP/WebSocket API, ingestion pipeline, rule engine, webhook dispatch,
//! broadcast hub, and OTA orchestration for the WebMACS backplane.

pub mod auth;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod ingest;
pub mod middleware;
pub mod ota;
pub mod plugin;
pub mod rule;
pub mod state;

use aide::axum::ApiRouter;
use axum::http::HeaderName;
use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::RequestIdMaker;
use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Every handler route lives under this prefix (§6); the OpenAPI document
/// and its Scalar viewer, added afterward, deliberately stay outside it.
const API_PREFIX: &str = "/api/v1";

/// Assembles the full `axum::Router` for one [`AppState`]: every route from
/// [`handler::routes`] nested under [`API_PREFIX`], the OpenAPI spec and
/// Scalar UI, and the ambient middleware stack (CORS, request tracing,
/// request-id propagation, body size limiting). Kept as a single free
/// function, not a method on `AppState`, so tests can build a router against
/// a fresh state without going through `webmacs-cli`'s bootstrap.
pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = middleware::cors::layer(&state.config.cors_origins);
    let body_limit = middleware::body_limit::layer(middleware::body_limit::DEFAULT_MAX_BODY_SIZE);

    ApiRouter::new()
        .nest(API_PREFIX, handler::routes())
        .with_open_api(OpenApiConfig::default())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(body_limit)
        .layer(cors)
        .layer(SetRequestIdLayer::new(request_id_header, RequestIdMaker))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    // build_router wires together modules covered by their own unit tests;
    // end-to-end request/response coverage lives in webmacs-cli's
    // integration tests, where a real AppState can be constructed.
}
