//! `PluginInstance.status` and `ChannelMapping.direction` — §3.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Runtime status of a configured plugin instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::PluginInstanceStatus"]
pub enum PluginInstanceStatus {
    #[db_rename = "inactive"]
    #[serde(rename = "inactive")]
    #[default]
    Inactive,
    #[db_rename = "connected"]
    #[serde(rename = "connected")]
    Connected,
    #[db_rename = "error"]
    #[serde(rename = "error")]
    Error,
    #[db_rename = "demo"]
    #[serde(rename = "demo")]
    Demo,
}

/// Direction of data flow for a [`ChannelMapping`](crate::model::ChannelMapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ChannelDirection"]
pub enum ChannelDirection {
    #[db_rename = "input"]
    #[serde(rename = "input")]
    Input,
    #[db_rename = "output"]
    #[serde(rename = "output")]
    Output,
    #[db_rename = "bidirectional"]
    #[serde(rename = "bidirectional")]
    Bidirectional,
}
