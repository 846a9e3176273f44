//! Webhook and WebhookDelivery models — §4.D.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{webhook_deliveries, webhooks};
use crate::types::WebhookDeliveryStatus;

/// A subscription to the event stream.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Webhook {
    pub id: i32,
    pub public_id: Uuid,
    pub url: String,
    pub secret: Option<String>,
    /// JSON array of subscribed event type strings.
    pub events: serde_json::Value,
    pub enabled: bool,
    pub owner_id: Option<i32>,
    pub created_at: Timestamp,
}

impl Webhook {
    /// Parses the `events` blob into a list of event type strings. Returns
    /// `None` if the blob is not a JSON array of strings (§4.D: "skip any
    /// subscription whose events blob fails to parse").
    pub fn event_types(&self) -> Option<Vec<String>> {
        self.events
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_owned))
            .collect()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWebhook {
    pub public_id: Uuid,
    pub url: String,
    pub secret: Option<String>,
    pub events: serde_json::Value,
    pub enabled: bool,
    pub owner_id: Option<i32>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WebhookChangeset {
    pub url: Option<String>,
    pub secret: Option<String>,
    pub events: Option<serde_json::Value>,
    pub enabled: Option<bool>,
}

/// One attempted delivery of an event to a [`Webhook`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = webhook_deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WebhookDelivery {
    pub id: i64,
    pub public_id: Uuid,
    pub webhook_id: i32,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: WebhookDeliveryStatus,
    pub attempts: i32,
    pub last_status_code: Option<i32>,
    pub last_error: Option<String>,
    pub delivered_on: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = webhook_deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWebhookDelivery {
    pub public_id: Uuid,
    pub webhook_id: i32,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: WebhookDeliveryStatus,
    pub attempts: i32,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = webhook_deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WebhookDeliveryChangeset {
    pub status: Option<WebhookDeliveryStatus>,
    pub attempts: Option<i32>,
    pub last_status_code: Option<i32>,
    pub last_error: Option<String>,
    pub delivered_on: Option<Timestamp>,
}
