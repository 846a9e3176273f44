//! Health-report shape for the `/health` endpoint (§6).

use std::collections::HashMap;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operational status of a dependency or the service as a whole.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Healthy,
    Degraded,
    Unhealthy,
}

/// A single health report, either for the service or one of its
/// dependencies (e.g. the database connection pool).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    pub response: Option<Duration>,
    pub message: Option<String>,
    pub checked_at: Timestamp,
    pub metrics: HashMap<String, Value>,
}

impl ServiceHealth {
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_has_no_message() {
        let health = ServiceHealth::healthy();
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert!(health.message.is_none());
    }

    #[test]
    fn degraded_carries_message() {
        let health = ServiceHealth::degraded("pool under pressure");
        assert_eq!(health.status, ServiceStatus::Degraded);
        assert_eq!(health.message.as_deref(), Some("pool under pressure"));
    }
}
