//! OpenAPI generation and Scalar UI serving, layered on top of an
//! [`ApiRouter`].

use aide::axum::ApiRouter;
use aide::openapi::{Contact, Info, License, OpenApi};
use aide::scalar::Scalar;
use axum::routing::{get, Router};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Where the generated spec and its Scalar viewer are served (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct OpenApiConfig {
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self { open_api_json: "/api/openapi.json".to_owned(), scalar_ui: "/api/scalar".to_owned() }
    }
}

/// Adds OpenAPI spec and Scalar UI routes to an [`ApiRouter`], consuming it
/// into a plain [`Router`] in the process.
pub trait RouterOpenApiExt<S> {
    fn with_open_api(self, config: OpenApiConfig) -> Router<S>;
    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: OpenApiConfig) -> Router<S> {
        let info = Info {
            title: "WebMACS API".to_owned(),
            summary: Some("IoT monitoring-and-control backplane".to_owned()),
            description: Some(
                "Ingests sensor telemetry, evaluates rules against it, dispatches webhooks, \
                 broadcasts to connected frontends, and orchestrates firmware rollout."
                    .to_owned(),
            ),
            contact: Some(Contact { name: Some("WebMACS".to_owned()), ..Contact::default() }),
            license: Some(License { name: "Proprietary".to_owned(), ..License::default() }),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Info::default()
        };

        self.with_open_api_info(config, info)
    }

    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi { info, ..OpenApi::default() };

        let scalar = Scalar::new(&config.open_api_json);
        let router =
            self.route(&config.scalar_ui, scalar.axum_route()).route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_match_spec() {
        let config = OpenApiConfig::default();
        assert_eq!(config.open_api_json, "/api/openapi.json");
        assert_eq!(config.scalar_ui, "/api/scalar");
    }

    #[test]
    fn builds_without_panicking() {
        let router: ApiRouter<()> = ApiRouter::new();
        let _ = router.with_open_api(OpenApiConfig::default());
    }
}
