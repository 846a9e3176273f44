//! The ingestion hot path (§4.F): filter by active plugin linkage, resolve
//! the active experiment, bulk-persist, fire throttled webhooks, evaluate
//! rules, and broadcast to subscribers.

use std::time::{Duration, Instant};

use diesel_async::AsyncPgConnection;
use jiff_diesel::Timestamp as DieselTimestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webmacs_data::model::{Datapoint, NewDatapoint};
use webmacs_data::query::{DatapointRepository, ExperimentRepository, PluginRegistry};
use webmacs_webhook::{Dispatcher, WebhookPayload};

use crate::broadcast::BroadcastHub;
use crate::rule::{self, ThrottleGate};

/// Tracing target for ingestion pipeline events.
pub const TRACING_TARGET: &str = "webmacs_server::ingest";

/// Default per-event sensor-webhook admission interval (§4.F.1).
pub const SENSOR_WEBHOOK_INTERVAL_SECS: f64 = 5.0;
/// Bounds on a configured sensor-webhook interval (§4.F.1).
pub const SENSOR_WEBHOOK_INTERVAL_MIN: f64 = 1.0;
pub const SENSOR_WEBHOOK_INTERVAL_MAX: f64 = 60.0;
/// Per-event broadcast admission interval (§4.F.2).
pub const BROADCAST_INTERVAL_SECS: f64 = 0.2;

/// One inbound measurement, as received over HTTP or the controller
/// telemetry channel (§4.F.3, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingDatapoint {
    pub value: f64,
    pub event_public_id: Uuid,
}

/// Outcome of one `ingest` call (§4.F step 1).
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub accepted: usize,
    pub rejected: usize,
}

/// Clamps a configured sensor-webhook interval into `[1, 60]` seconds
/// (§4.F.1).
pub fn sensor_webhook_interval(configured_secs: f64) -> Duration {
    Duration::from_secs_f64(
        configured_secs.clamp(SENSOR_WEBHOOK_INTERVAL_MIN, SENSOR_WEBHOOK_INTERVAL_MAX),
    )
}

/// Owns the two throttle gates the ingestion pipeline shares across calls
/// (§4.F.1, §4.F.2, §9: "a single mutex per shared map for throttles").
pub struct IngestThrottles {
    pub sensor_webhook: ThrottleGate,
    pub broadcast: ThrottleGate,
    pub sensor_webhook_interval: Duration,
}

impl IngestThrottles {
    pub fn new(sensor_webhook_interval_secs: f64) -> Self {
        Self {
            sensor_webhook: ThrottleGate::new(),
            broadcast: ThrottleGate::new(),
            sensor_webhook_interval: sensor_webhook_interval(sensor_webhook_interval_secs),
        }
    }
}

impl Default for IngestThrottles {
    fn default() -> Self {
        Self::new(SENSOR_WEBHOOK_INTERVAL_SECS)
    }
}

/// One accepted row, reduced to the fields the frontend broadcast frame
/// needs (§6).
#[derive(Debug, Clone, Serialize)]
struct BroadcastDatapoint {
    value: f64,
    event_public_id: Uuid,
    timestamp: jiff::Timestamp,
    experiment_public_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
struct BatchFrame {
    #[serde(rename = "type")]
    frame_type: &'static str,
    datapoints: Vec<BroadcastDatapoint>,
}

/// Runs the full six-step pipeline from §4.F over one batch, within the
/// caller's transaction.
pub async fn ingest(
    conn: &mut AsyncPgConnection,
    dispatcher: &Dispatcher,
    broadcast: &BroadcastHub,
    throttles: &IngestThrottles,
    batch: Vec<IncomingDatapoint>,
) -> webmacs_data::PgResult<IngestOutcome> {
    // Step 1: filter by active plugin linkage.
    let candidates: Vec<Uuid> = batch.iter().map(|d| d.event_public_id).collect();
    let active = PluginRegistry::active_event_ids(conn, &candidates).await?;

    let (accepted_input, rejected): (Vec<IncomingDatapoint>, Vec<IncomingDatapoint>) =
        batch.into_iter().partition(|d| active.contains(&d.event_public_id));

    if accepted_input.is_empty() {
        return Ok(IngestOutcome { accepted: 0, rejected: rejected.len() });
    }

    // Step 2: resolve the active experiment.
    let active_experiment = ExperimentRepository::find_active(conn).await?;

    // Step 3: persist with a single shared "now".
    let now = jiff::Timestamp::now();
    let now_diesel = DieselTimestamp::from(now);
    let mut event_id_by_public: std::collections::HashMap<Uuid, i32> = std::collections::HashMap::new();
    for event_public_id in active.iter() {
        if let Ok(event) = webmacs_data::query::EventRepository::find_by_public_id(conn, *event_public_id).await {
            event_id_by_public.insert(*event_public_id, event.id);
        }
    }

    let mut rows = Vec::with_capacity(accepted_input.len());
    for d in &accepted_input {
        let Some(event_id) = event_id_by_public.get(&d.event_public_id).copied() else {
            continue;
        };
        rows.push(NewDatapoint {
            public_id: Uuid::new_v4(),
            value: d.value,
            timestamp: now_diesel,
            event_id,
            experiment_id: active_experiment.as_ref().map(|e| e.id),
        });
    }

    let inserted: Vec<Datapoint> = DatapointRepository::bulk_insert(conn, &rows).await?;

    // Step 4: fire per-event-throttled sensor-reading webhooks.
    let instant_now = Instant::now();
    for d in &accepted_input {
        if throttles.sensor_webhook.admit(d.event_public_id, instant_now, throttles.sensor_webhook_interval) {
            let dispatcher = dispatcher.clone();
            let event_public_id = d.event_public_id;
            let value = d.value;
            tokio::spawn(async move {
                let payload = WebhookPayload::sensor_reading(event_public_id, value);
                dispatcher.dispatch("sensor.reading", payload).await;
            });
        }
    }

    // Step 5: evaluate rules, deduplicated by event (last value wins).
    let mut last_value_by_event: std::collections::HashMap<Uuid, f64> = std::collections::HashMap::new();
    for d in &accepted_input {
        last_value_by_event.insert(d.event_public_id, d.value);
    }
    for (event_public_id, value) in &last_value_by_event {
        if let Err(err) = rule::evaluate_and_trigger(conn, dispatcher, *event_public_id, *value).await {
            tracing::error!(target: TRACING_TARGET, event_public_id = %event_public_id, error = %err, "rule evaluation failed; continuing ingestion");
        }
    }

    // Step 6: broadcast to the frontend topic, per-event throttled.
    let admitted: std::collections::HashSet<Uuid> = accepted_input
        .iter()
        .map(|d| d.event_public_id)
        .filter(|event_public_id| {
            throttles.broadcast.admit(
                *event_public_id,
                instant_now,
                Duration::from_secs_f64(BROADCAST_INTERVAL_SECS),
            )
        })
        .collect();

    if !admitted.is_empty() {
        let frame_datapoints: Vec<BroadcastDatapoint> = inserted
            .iter()
            .zip(accepted_input.iter())
            .filter(|(_, input)| admitted.contains(&input.event_public_id))
            .map(|(row, input)| BroadcastDatapoint {
                value: row.value,
                event_public_id: input.event_public_id,
                timestamp: jiff::Timestamp::from(row.timestamp),
                experiment_public_id: active_experiment.as_ref().map(|e| e.public_id),
            })
            .collect();

        if !frame_datapoints.is_empty() {
            broadcast.broadcast(
                "frontend",
                &BatchFrame { frame_type: "datapoints_batch", datapoints: frame_datapoints },
            );
        }
    }

    Ok(IngestOutcome { accepted: inserted.len(), rejected: rejected.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_clamps_to_one_through_sixty_seconds() {
        assert_eq!(sensor_webhook_interval(0.1), Duration::from_secs(1));
        assert_eq!(sensor_webhook_interval(500.0), Duration::from_secs(60));
        assert_eq!(sensor_webhook_interval(5.0), Duration::from_secs_f64(5.0));
    }
}
