//! Webhook signing, payload construction, and bounded-concurrency dispatch
//! with retry (§4.D).

mod dispatcher;
pub mod error;
pub mod request;
pub mod reqwest;

pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use request::WebhookPayload;
pub use reqwest::{DeliveryConfig, WebhookClient};
