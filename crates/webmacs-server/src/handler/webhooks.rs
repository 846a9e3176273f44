//! Webhook subscription handlers (§6 `/webhooks*`).

use aide::axum::ApiRouter;
use aide::axum::routing::{get_with, post_with};
use aide::transform::TransformOperation;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webmacs_data::model::NewWebhook;
use webmacs_data::query::{WebhookDeliveryRepository, WebhookRepository};
use webmacs_data::types::{OffsetPage, OffsetPagination, WebhookDeliveryStatus};

use crate::error::{HttpError, Result};
use crate::extract::{AuthUser, PgPool};
use crate::state::AppState;

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateWebhook {
    url: String,
    secret: Option<String>,
    events: Vec<String>,
    #[serde(default)]
    enabled: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
struct WebhookResponse {
    public_id: Uuid,
    url: String,
    events: Vec<String>,
    enabled: bool,
}

impl From<webmacs_data::model::Webhook> for WebhookResponse {
    fn from(w: webmacs_data::model::Webhook) -> Self {
        let events = w.event_types().unwrap_or_default();
        Self { public_id: w.public_id, url: w.url, events, enabled: w.enabled }
    }
}

async fn create_webhook(
    PgPool(mut conn): PgPool,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateWebhook>,
) -> Result<(StatusCode, Json<WebhookResponse>)> {
    let webhook = WebhookRepository::create(
        &mut conn,
        NewWebhook {
            public_id: Uuid::new_v4(),
            url: request.url,
            secret: request.secret,
            events: serde_json::Value::from(request.events),
            enabled: request.enabled,
            owner_id: Some(user.id),
        },
    )
    .await
    .map_err(HttpError::from)?;

    Ok((StatusCode::CREATED, Json(webhook.into())))
}

fn create_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create webhook")
        .description("Registers a subscription to the event stream; `url` must be unique.")
        .response::<201, Json<WebhookResponse>>()
        .response::<409, ()>()
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListDeliveriesQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_page_size")]
    page_size: i64,
    status: Option<WebhookDeliveryStatus>,
}

fn default_page() -> i64 {
    1
}
fn default_page_size() -> i64 {
    webmacs_data::types::pagination::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, JsonSchema)]
struct DeliveryResponse {
    public_id: Uuid,
    event_type: String,
    status: WebhookDeliveryStatus,
    attempts: i32,
    last_status_code: Option<i32>,
    last_error: Option<String>,
}

impl From<webmacs_data::model::WebhookDelivery> for DeliveryResponse {
    fn from(d: webmacs_data::model::WebhookDelivery) -> Self {
        Self {
            public_id: d.public_id,
            event_type: d.event_type,
            status: d.status,
            attempts: d.attempts,
            last_status_code: d.last_status_code,
            last_error: d.last_error,
        }
    }
}

async fn list_deliveries(
    PgPool(mut conn): PgPool,
    _user: AuthUser,
    Path(webhook_public_id): Path<Uuid>,
    Query(query): Query<ListDeliveriesQuery>,
) -> Result<Json<OffsetPage<DeliveryResponse>>> {
    let webhook = WebhookRepository::find_by_public_id(&mut conn, webhook_public_id)
        .await
        .map_err(HttpError::from)?;

    let pagination = OffsetPagination::new(query.page, query.page_size);
    let (deliveries, total) =
        WebhookDeliveryRepository::list_for_webhook(&mut conn, webhook.id, query.status, pagination)
            .await
            .map_err(HttpError::from)?;

    let page = OffsetPage::new(pagination, total, deliveries).map(DeliveryResponse::from);
    Ok(Json(page))
}

fn list_deliveries_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List webhook deliveries")
        .description("Paginated delivery history for a webhook, optionally filtered by status.")
        .response::<200, Json<OffsetPage<DeliveryResponse>>>()
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/webhooks", post_with(create_webhook, create_webhook_docs))
        .api_route("/webhooks/{id}/deliveries", get_with(list_deliveries, list_deliveries_docs))
        .with_path_items(|item| item.tag("Webhooks"))
}
