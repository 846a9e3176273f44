//! Unauthenticated liveness/readiness handler (§6 `GET /health`).

use aide::axum::ApiRouter;
use aide::axum::routing::get_with;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;
use webmacs_data::query::DatapointRepository;

use crate::error::Result;
use crate::extract::PgPool;
use crate::state::AppState;

#[derive(Debug, Serialize, JsonSchema)]
struct HealthResponse {
    status: &'static str,
    version: String,
    database: &'static str,
    last_datapoint: Option<jiff::Timestamp>,
    uptime_seconds: u64,
}

async fn health(
    PgPool(mut conn): PgPool,
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>> {
    let connected = state.pg.check_connectivity().await.is_ok();

    let last_datapoint = DatapointRepository::most_recent_timestamp(&mut conn)
        .await
        .ok()
        .flatten()
        .map(jiff::Timestamp::from);

    let uptime_seconds = state.started_at.elapsed().as_secs();

    Ok(Json(HealthResponse {
        status: if connected { "ok" } else { "degraded" },
        version: state.config.firmware_version.clone(),
        database: if connected { "connected" } else { "unavailable" },
        last_datapoint,
        uptime_seconds,
    }))
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Unauthenticated liveness/readiness probe; always 200, `status` reflects database reachability.")
        .response::<200, Json<HealthResponse>>()
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new().api_route("/health", get_with(health, health_docs)).with_path_items(|item| item.tag("Health"))
}
