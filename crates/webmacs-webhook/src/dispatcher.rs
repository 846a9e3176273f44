//! Fan-out and per-webhook retry orchestration (§4.D).

use std::sync::Arc;

use jiff_diesel::Timestamp as DieselTimestamp;
use tokio::sync::Semaphore;
use uuid::Uuid;
use webmacs_data::model::{NewWebhookDelivery, Webhook, WebhookDeliveryChangeset};
use webmacs_data::query::{WebhookDeliveryRepository, WebhookRepository};
use webmacs_data::types::WebhookDeliveryStatus;
use webmacs_data::PgClient;

use crate::reqwest::{DeliveryConfig, WebhookClient, TRACING_TARGET};
use crate::request::WebhookPayload;

/// Dispatches event notifications to subscribed webhooks with bounded
/// concurrency and at-least-once retry semantics.
#[derive(Clone)]
pub struct Dispatcher {
    db: PgClient,
    client: WebhookClient,
    config: DeliveryConfig,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(db: PgClient, config: DeliveryConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_deliveries));
        Self {
            db,
            client: WebhookClient::new(config.clone()),
            config,
            permits,
        }
    }

    /// Queries every enabled webhook subscribed to `event_type` and spawns
    /// one detached delivery task per match. Never blocks the caller on the
    /// HTTP round trips.
    pub async fn dispatch(&self, event_type: &str, payload: WebhookPayload) {
        let mut conn = match self.db.get_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to acquire connection for webhook fan-out");
                return;
            }
        };

        let webhooks = match WebhookRepository::find_enabled(&mut conn).await {
            Ok(webhooks) => webhooks,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to list enabled webhooks");
                return;
            }
        };
        drop(conn);

        let payload_bytes = match payload.to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to serialize webhook payload");
                return;
            }
        };

        for webhook in webhooks {
            let Some(event_types) = webhook.event_types() else {
                tracing::warn!(target: TRACING_TARGET, webhook_id = %webhook.public_id, "skipping webhook with unparseable events blob");
                continue;
            };
            if !event_types.iter().any(|et| et == event_type) {
                continue;
            }

            let dispatcher = self.clone();
            let event_type = event_type.to_string();
            let payload_bytes = payload_bytes.clone();
            tokio::spawn(async move {
                dispatcher.deliver(webhook, event_type, payload_bytes).await;
            });
        }
    }

    /// Runs the full retry loop for one webhook, holding one semaphore
    /// permit for the duration (§5).
    async fn deliver(&self, webhook: Webhook, event_type: String, payload_bytes: Vec<u8>) {
        let Ok(_permit) = self.permits.clone().acquire_owned().await else {
            return;
        };

        let mut conn = match self.db.background_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to acquire background connection for webhook delivery");
                return;
            }
        };

        let delivery = match WebhookDeliveryRepository::create(
            &mut conn,
            NewWebhookDelivery {
                public_id: Uuid::new_v4(),
                webhook_id: webhook.id,
                event_type: event_type.clone(),
                payload: serde_json::from_slice(&payload_bytes).unwrap_or(serde_json::Value::Null),
                status: WebhookDeliveryStatus::Pending,
                attempts: 0,
            },
        )
        .await
        {
            Ok(delivery) => delivery,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "failed to record webhook delivery");
                return;
            }
        };

        for attempt in 1..=self.config.max_retries {
            let result = self
                .client
                .attempt(&webhook.url, &event_type, &payload_bytes, webhook.secret.as_deref())
                .await;

            match result {
                Ok(status_code) if status_code < 300 => {
                    if let Err(err) = WebhookDeliveryRepository::update(
                        &mut conn,
                        delivery.id,
                        WebhookDeliveryChangeset {
                            status: Some(WebhookDeliveryStatus::Delivered),
                            attempts: Some(attempt as i32),
                            last_status_code: Some(status_code as i32),
                            last_error: Some(String::new()),
                            delivered_on: Some(DieselTimestamp::from(jiff::Timestamp::now())),
                        },
                    )
                    .await
                    {
                        tracing::error!(target: TRACING_TARGET, error = %err, delivery_id = delivery.id, "failed to record successful webhook delivery");
                    }
                    return;
                }
                Ok(status_code) => {
                    self.record_failed_attempt(
                        &mut conn,
                        delivery.id,
                        attempt,
                        Some(status_code as i32),
                        format!("webhook endpoint responded with status {status_code}"),
                    )
                    .await;
                }
                Err(err) => {
                    self.record_failed_attempt(&mut conn, delivery.id, attempt, None, err.to_string())
                        .await;
                }
            }

            if attempt < self.config.max_retries {
                tokio::time::sleep(self.config.backoff(attempt)).await;
            }
        }

        if let Err(err) = WebhookDeliveryRepository::update(
            &mut conn,
            delivery.id,
            WebhookDeliveryChangeset {
                status: Some(WebhookDeliveryStatus::DeadLetter),
                ..Default::default()
            },
        )
        .await
        {
            tracing::error!(target: TRACING_TARGET, error = %err, delivery_id = delivery.id, "failed to record dead-lettered webhook delivery");
        }
    }

    async fn record_failed_attempt(
        &self,
        conn: &mut webmacs_data::PgConn,
        delivery_id: i64,
        attempt: u32,
        status_code: Option<i32>,
        error: String,
    ) {
        if let Err(err) = WebhookDeliveryRepository::update(
            conn,
            delivery_id,
            WebhookDeliveryChangeset {
                status: None,
                attempts: Some(attempt as i32),
                last_status_code: status_code,
                last_error: Some(error),
                delivered_on: None,
            },
        )
        .await
        {
            tracing::error!(target: TRACING_TARGET, error = %err, delivery_id, "failed to record webhook delivery attempt");
        }
    }
}
