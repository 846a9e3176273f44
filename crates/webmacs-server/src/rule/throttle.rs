//! Stateful admission gate: true/false per (key, now), updating internal
//! state on admission (§4.F.1/§4.F.2, GLOSSARY "Throttle gate").

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// A single mutex-guarded map from key to last-admission instant, shared by
/// every caller (§5: "one mutex per shared map for throttles").
#[derive(Default)]
pub struct ThrottleGate {
    last_admitted: Mutex<HashMap<Uuid, Instant>>,
}

impl ThrottleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` (and records `now`) if `interval` has elapsed since
    /// the last admission for `key`, or if `key` has never been admitted.
    pub fn admit(&self, key: Uuid, now: Instant, interval: Duration) -> bool {
        let mut map = self.last_admitted.lock().unwrap();
        let admit = match map.get(&key) {
            Some(last) => now.duration_since(*last) >= interval,
            None => true,
        };
        if admit {
            map.insert(key, now);
        }
        admit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_admission_always_passes() {
        let gate = ThrottleGate::new();
        assert!(gate.admit(Uuid::nil(), Instant::now(), Duration::from_secs(5)));
    }

    #[test]
    fn second_admission_within_interval_is_rejected() {
        let gate = ThrottleGate::new();
        let key = Uuid::nil();
        let t0 = Instant::now();
        assert!(gate.admit(key, t0, Duration::from_secs(5)));
        assert!(!gate.admit(key, t0 + Duration::from_secs(1), Duration::from_secs(5)));
    }

    #[test]
    fn admission_after_interval_elapses_passes() {
        let gate = ThrottleGate::new();
        let key = Uuid::nil();
        let t0 = Instant::now();
        assert!(gate.admit(key, t0, Duration::from_secs(5)));
        assert!(gate.admit(key, t0 + Duration::from_secs(6), Duration::from_secs(5)));
    }

    #[test]
    fn distinct_keys_are_independent() {
        let gate = ThrottleGate::new();
        let t0 = Instant::now();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(gate.admit(a, t0, Duration::from_secs(5)));
        assert!(gate.admit(b, t0, Duration::from_secs(5)));
    }
}
