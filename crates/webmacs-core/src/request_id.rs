//! Request-correlation identifier minted at request ingress (§7).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A UUID minted once per inbound request and threaded through logs so an
/// unexpected error can be correlated back to the request that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
