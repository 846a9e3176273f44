//! Diesel models: one `Queryable`/`Insertable`/`AsChangeset` triad per
//! entity in §3.

mod collaborator;
mod datapoint;
mod event;
mod experiment;
mod firmware_update;
mod plugin_instance;
mod rule;
mod webhook;

pub use collaborator::{
    ApiToken, BlacklistToken, Dashboard, DashboardWidget, LogEntry, NewApiToken,
    NewBlacklistToken, NewLogEntry, NewUser, User,
};
pub use datapoint::{Datapoint, DatapointWithEvent, NewDatapoint};
pub use event::{Event, EventChangeset, NewEvent};
pub use experiment::{Experiment, ExperimentChangeset, NewExperiment};
pub use firmware_update::{FirmwareUpdate, FirmwareUpdateChangeset, NewFirmwareUpdate};
pub use plugin_instance::{
    ChannelMapping, NewChannelMapping, NewPluginInstance, PluginInstance,
    PluginInstanceChangeset,
};
pub use rule::{NewRule, Rule, RuleChangeset};
pub use webhook::{
    NewWebhook, NewWebhookDelivery, Webhook, WebhookChangeset, WebhookDelivery,
    WebhookDeliveryChangeset,
};
