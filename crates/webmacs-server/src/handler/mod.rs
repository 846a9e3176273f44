//! Route assembly: one `ApiRouter<AppState>` per concern, merged here (§6).

mod auth;
mod channel;
mod datapoints;
mod health;
mod ota;
mod webhooks;

use aide::axum::ApiRouter;

use crate::state::AppState;

/// The full set of HTTP and WebSocket routes. `/health` and `/auth/login`
/// are the only endpoints reachable without a bearer token; every other
/// handler pulls [`crate::extract::AuthUser`] to enforce that itself,
/// rather than a blanket auth layer (see `middleware` module docs).
pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(datapoints::routes())
        .merge(ota::routes())
        .merge(webhooks::routes())
        .merge(channel::routes())
}
