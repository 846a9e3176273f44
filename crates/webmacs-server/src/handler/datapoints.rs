//! Datapoint ingestion and retrieval handlers (§6 `/datapoints*`).

use aide::axum::ApiRouter;
use aide::axum::routing::{get_with, post_with};
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HttpError, Result};
use crate::extract::{AuthUser, PgPool};
use crate::ingest::{self, IncomingDatapoint};
use crate::state::AppState;

const TRACING_TARGET: &str = "webmacs_server::handler::datapoints";

/// Hard ceiling on one batch request (§6, §8 S1/S2).
const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateDatapoint {
    value: f64,
    event_public_id: Uuid,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateDatapointBatch {
    datapoints: Vec<CreateDatapoint>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct BatchAccepted {
    message: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct LatestDatapoint {
    value: f64,
    event_public_id: Uuid,
    timestamp: jiff::Timestamp,
    experiment_public_id: Option<Uuid>,
}

async fn create_datapoint(
    PgPool(mut conn): PgPool,
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<CreateDatapoint>,
) -> Result<StatusCode> {
    let batch = vec![IncomingDatapoint { value: request.value, event_public_id: request.event_public_id }];

    ingest::ingest(&mut conn, &state.dispatcher, &state.broadcast, &state.throttles, batch)
        .await
        .map_err(HttpError::from)?;

    Ok(StatusCode::CREATED)
}

fn create_datapoint_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create datapoint").description("Ingests a single measurement through the ingestion pipeline.").response::<201, ()>()
}

async fn create_datapoint_batch(
    PgPool(mut conn): PgPool,
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<CreateDatapointBatch>,
) -> Result<(StatusCode, Json<BatchAccepted>)> {
    if request.datapoints.len() > MAX_BATCH_SIZE {
        tracing::warn!(target: TRACING_TARGET, batch_size = request.datapoints.len(), "batch exceeds maximum size");
        return Err(crate::error::reject(
            webmacs_core::ErrorKind::InvalidInput,
            format!("batch size {} exceeds the maximum of {MAX_BATCH_SIZE}", request.datapoints.len()),
        ));
    }

    let batch: Vec<IncomingDatapoint> = request
        .datapoints
        .into_iter()
        .map(|d| IncomingDatapoint { value: d.value, event_public_id: d.event_public_id })
        .collect();

    let outcome = ingest::ingest(&mut conn, &state.dispatcher, &state.broadcast, &state.throttles, batch)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(target: TRACING_TARGET, accepted = outcome.accepted, rejected = outcome.rejected, "batch ingested");

    Ok((
        StatusCode::CREATED,
        Json(BatchAccepted { message: format!("{} datapoints successfully created.", outcome.accepted) }),
    ))
}

fn create_datapoint_batch_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create datapoint batch")
        .description("Ingests up to 500 measurements in one call; larger batches are rejected.")
        .response::<201, Json<BatchAccepted>>()
        .response::<422, ()>()
}

async fn latest_datapoints(
    PgPool(mut conn): PgPool,
    _user: AuthUser,
) -> Result<Json<Vec<LatestDatapoint>>> {
    let rows = webmacs_data::query::DatapointRepository::latest_per_event(&mut conn)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(
        rows.into_iter()
            .map(|row| LatestDatapoint {
                value: row.value,
                event_public_id: row.event_public_id,
                timestamp: jiff::Timestamp::from(row.timestamp),
                experiment_public_id: row.experiment_public_id,
            })
            .collect(),
    ))
}

fn latest_datapoints_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Latest datapoints").description("Returns the most recent datapoint for every event.").response::<200, Json<Vec<LatestDatapoint>>>()
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/datapoints", post_with(create_datapoint, create_datapoint_docs))
        .api_route("/datapoints/batch", post_with(create_datapoint_batch, create_datapoint_batch_docs))
        .api_route("/datapoints/latest", get_with(latest_datapoints, latest_datapoints_docs))
        .with_path_items(|item| item.tag("Datapoints"))
}
