//! The webhook payload builder (§4.D).
//!
//! Field order matters: the JSON bytes produced here are what gets signed,
//! so the shape is a plain struct (serde serializes struct fields in
//! declaration order) rather than a hash map.

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// A webhook notification payload.
///
/// `sensor` and `device` are both always present (nullable) per the design
/// decision recorded for the ambiguity between the two naming conventions
/// seen across call sites; `value`, `rule_name`, `operator`, and
/// `threshold` are populated only for rule-triggered deliveries.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event_type: String,
    pub time: Timestamp,
    pub device: Option<Uuid>,
    pub sensor: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl WebhookPayload {
    /// The `sensor.reading` payload fired by the ingestion pipeline
    /// (§4.F step 4).
    pub fn sensor_reading(sensor: Uuid, value: f64) -> Self {
        Self {
            event_type: "sensor.reading".to_string(),
            time: Timestamp::now(),
            device: None,
            sensor: Some(sensor),
            value: Some(value),
            rule_name: None,
            operator: None,
            threshold: None,
        }
    }

    /// The payload fired by a triggered rule (§4.E step 2d), defaulting the
    /// event type to `sensor.threshold_exceeded` when the rule does not
    /// configure one.
    pub fn rule_triggered(
        event_type: Option<String>,
        rule_name: String,
        operator: String,
        threshold: f64,
        sensor: Uuid,
        value: f64,
    ) -> Self {
        Self {
            event_type: event_type.unwrap_or_else(|| "sensor.threshold_exceeded".to_string()),
            time: Timestamp::now(),
            device: None,
            sensor: Some(sensor),
            value: Some(value),
            rule_name: Some(rule_name),
            operator: Some(operator),
            threshold: Some(threshold),
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_reading_omits_rule_fields() {
        let payload = WebhookPayload::sensor_reading(Uuid::nil(), 42.0);
        let bytes = payload.to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "sensor.reading");
        assert!(json.get("rule_name").is_none());
        assert_eq!(json["device"], serde_json::Value::Null);
    }

    #[test]
    fn field_order_is_stable_for_signing() {
        let payload = WebhookPayload::sensor_reading(Uuid::nil(), 1.0);
        let bytes = payload.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let type_pos = text.find("\"type\"").unwrap();
        let time_pos = text.find("\"time\"").unwrap();
        assert!(type_pos < time_pos);
    }
}
