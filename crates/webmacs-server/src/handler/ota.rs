//! OTA firmware update handlers (§6 `/ota/*`).

use aide::axum::ApiRouter;
use aide::axum::routing::{get_with, post_with};
use aide::transform::TransformOperation;
use axum::extract::{Path, State};
use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webmacs_data::types::FirmwareStatus;

use crate::error::{HttpError, Result};
use crate::extract::{AuthUser, PgPool};
use crate::ota;
use crate::state::AppState;

#[derive(Debug, Serialize, JsonSchema)]
struct UpdateCheckResponse {
    current_version: String,
    latest_version: Option<String>,
    update_available: bool,
    github_owner: String,
    github_repo: String,
}

async fn check_for_updates(
    PgPool(mut conn): PgPool,
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<UpdateCheckResponse>> {
    let current_version = state.config.firmware_version.clone();
    let status = ota::discover_updates(
        &mut conn,
        &current_version,
        &state.config.github_owner,
        &state.config.github_repo,
    )
    .await
    .map_err(HttpError::from)?;

    Ok(Json(UpdateCheckResponse {
        current_version,
        latest_version: status.best.map(|b| b.version),
        update_available: status.update_available,
        github_owner: state.config.github_owner.clone(),
        github_repo: state.config.github_repo.clone(),
    }))
}

fn check_for_updates_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Check for updates")
        .description("Merges the local firmware table with the configured GitHub releases index.")
        .response::<200, Json<UpdateCheckResponse>>()
}

#[derive(Debug, Deserialize, Default, JsonSchema)]
struct ApplyRequest {
    download_url: Option<String>,
    file_hash_sha256: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct FirmwareResponse {
    public_id: Uuid,
    version: String,
    status: FirmwareStatus,
    error_message: Option<String>,
}

impl From<webmacs_data::model::FirmwareUpdate> for FirmwareResponse {
    fn from(f: webmacs_data::model::FirmwareUpdate) -> Self {
        Self { public_id: f.public_id, version: f.version, status: f.status, error_message: f.error_message }
    }
}

async fn apply(
    PgPool(mut conn): PgPool,
    State(state): State<AppState>,
    _user: AuthUser,
    Path(firmware_public_id): Path<Uuid>,
    body: Option<Json<ApplyRequest>>,
) -> Result<Json<FirmwareResponse>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let firmware = match request.download_url {
        Some(url) => ota::apply_with_download(
            &mut conn,
            &state.config.firmware_dir,
            firmware_public_id,
            &url,
            request.file_hash_sha256.as_deref(),
        )
        .await
        .map_err(HttpError::from)?,
        None => ota::apply_in_place(&mut conn, firmware_public_id, request.file_hash_sha256.as_deref())
            .await
            .map_err(HttpError::from)?,
    };

    Ok(Json(firmware.into()))
}

fn apply_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Apply firmware update")
        .description("Runs the OTA apply flow; 409 if the record is not in a state that allows it.")
        .response::<200, Json<FirmwareResponse>>()
        .response::<409, ()>()
}

async fn rollback(
    PgPool(mut conn): PgPool,
    _user: AuthUser,
    Path(firmware_public_id): Path<Uuid>,
) -> Result<Json<FirmwareResponse>> {
    let firmware = ota::rollback(&mut conn, firmware_public_id).await.map_err(HttpError::from)?;
    Ok(Json(firmware.into()))
}

fn rollback_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Roll back firmware update")
        .description("Reverts a completed update; 409 if it is not in `completed` status.")
        .response::<200, Json<FirmwareResponse>>()
        .response::<409, ()>()
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/ota/check", get_with(check_for_updates, check_for_updates_docs))
        .api_route("/ota/{id}/apply", post_with(apply, apply_docs))
        .api_route("/ota/{id}/rollback", post_with(rollback, rollback_docs))
        .with_path_items(|item| item.tag("OTA"))
}
