//! CORS configuration (§6 `CORS_ORIGINS`).

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Builds a CORS layer from the configured origin list. An empty list
/// permits no cross-origin requests rather than defaulting open.
pub fn layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|origin| origin.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_panicking_for_empty_and_populated_origins() {
        let _ = layer(&[]);
        let _ = layer(&["https://app.example.com".to_string()]);
    }
}
