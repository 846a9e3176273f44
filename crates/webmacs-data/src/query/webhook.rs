//! Webhook and WebhookDelivery repositories — §4.D.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{
    NewWebhook, NewWebhookDelivery, Webhook, WebhookChangeset, WebhookDelivery,
    WebhookDeliveryChangeset,
};
use crate::schema;
use crate::types::{OffsetPagination, WebhookDeliveryStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct WebhookRepository;

impl WebhookRepository {
    pub async fn create(conn: &mut AsyncPgConnection, webhook: NewWebhook) -> PgResult<Webhook> {
        use schema::webhooks;

        diesel::insert_into(webhooks::table)
            .values(&webhook)
            .returning(Webhook::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        webhook_public_id: Uuid,
    ) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        webhooks
            .filter(public_id.eq(webhook_public_id))
            .select(Webhook::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Every enabled webhook; fan-out (§4.D) filters by event type in
    /// application code since `events` is an opaque JSON blob per webhook.
    pub async fn find_enabled(conn: &mut AsyncPgConnection) -> PgResult<Vec<Webhook>> {
        use schema::webhooks::dsl::*;

        webhooks
            .filter(enabled.eq(true))
            .select(Webhook::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        webhook_public_id: Uuid,
        changeset: WebhookChangeset,
    ) -> PgResult<Webhook> {
        use schema::webhooks::dsl::*;

        diesel::update(webhooks.filter(public_id.eq(webhook_public_id)))
            .set(&changeset)
            .returning(Webhook::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WebhookDeliveryRepository;

impl WebhookDeliveryRepository {
    /// Step 1 of §4.D's per-webhook delivery: insert a `pending` row with
    /// `attempts = 0` before the first HTTP attempt.
    pub async fn create(
        conn: &mut AsyncPgConnection,
        delivery: NewWebhookDelivery,
    ) -> PgResult<WebhookDelivery> {
        use schema::webhook_deliveries;

        diesel::insert_into(webhook_deliveries::table)
            .values(&delivery)
            .returning(WebhookDelivery::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        delivery_id: i64,
        changeset: WebhookDeliveryChangeset,
    ) -> PgResult<WebhookDelivery> {
        use schema::webhook_deliveries::dsl::*;

        diesel::update(webhook_deliveries.filter(id.eq(delivery_id)))
            .set(&changeset)
            .returning(WebhookDelivery::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Convenience wrapper for the terminal `delivered` transition.
    pub async fn mark_delivered(
        conn: &mut AsyncPgConnection,
        delivery_id: i64,
        status_code: i32,
        delivered_on: Timestamp,
    ) -> PgResult<WebhookDelivery> {
        Self::update(
            conn,
            delivery_id,
            WebhookDeliveryChangeset {
                status: Some(WebhookDeliveryStatus::Delivered),
                last_status_code: Some(status_code),
                last_error: Some(String::new()),
                delivered_on: Some(delivered_on),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_for_webhook(
        conn: &mut AsyncPgConnection,
        webhook_id_value: i32,
        status_filter: Option<WebhookDeliveryStatus>,
        pagination: OffsetPagination,
    ) -> PgResult<(Vec<WebhookDelivery>, i64)> {
        use schema::webhook_deliveries::dsl::*;

        let mut count_query = webhook_deliveries
            .filter(webhook_id.eq(webhook_id_value))
            .into_boxed();
        let mut data_query = webhook_deliveries
            .filter(webhook_id.eq(webhook_id_value))
            .into_boxed();

        if let Some(filter_status) = status_filter {
            count_query = count_query.filter(status.eq(filter_status));
            data_query = data_query.filter(status.eq(filter_status));
        }

        let total = count_query
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(PgError::from)?;

        let data = data_query
            .order(id.desc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .select(WebhookDelivery::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok((data, total))
    }
}
