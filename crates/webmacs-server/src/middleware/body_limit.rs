//! Request body size limiting (firmware uploads aside, most bodies here
//! are small JSON payloads).

use tower_http::limit::RequestBodyLimitLayer;

/// Default maximum request body size: 2MiB, generous for a batch of
/// datapoints (§4.F.3) but well under a firmware image.
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

pub fn layer(max_size: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_panicking() {
        let _ = layer(DEFAULT_MAX_BODY_SIZE);
    }
}
