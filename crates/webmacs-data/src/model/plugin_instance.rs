//! PluginInstance and ChannelMapping models — §3, §4.I.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{channel_mappings, plugin_instances};
use crate::types::{ChannelDirection, PluginInstanceStatus};

/// A configured instance of a device driver.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = plugin_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PluginInstance {
    pub id: i32,
    pub public_id: Uuid,
    pub plugin_id: String,
    pub instance_name: String,
    pub demo_mode: bool,
    pub enabled: bool,
    pub status: PluginInstanceStatus,
    pub config: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plugin_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPluginInstance {
    pub public_id: Uuid,
    pub plugin_id: String,
    pub instance_name: String,
    pub demo_mode: bool,
    pub enabled: bool,
    pub status: PluginInstanceStatus,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = plugin_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PluginInstanceChangeset {
    pub instance_name: Option<String>,
    pub demo_mode: Option<bool>,
    pub enabled: Option<bool>,
    pub status: Option<PluginInstanceStatus>,
    pub config: Option<serde_json::Value>,
    pub updated_at: Option<Timestamp>,
}

/// Link between a plugin instance channel and an [`Event`](crate::model::Event).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = channel_mappings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChannelMapping {
    pub id: i32,
    pub public_id: Uuid,
    pub plugin_instance_id: i32,
    pub channel_id: String,
    pub channel_name: String,
    pub direction: ChannelDirection,
    pub unit: Option<String>,
    pub event_id: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = channel_mappings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChannelMapping {
    pub public_id: Uuid,
    pub plugin_instance_id: i32,
    pub channel_id: String,
    pub channel_name: String,
    pub direction: ChannelDirection,
    pub unit: Option<String>,
    pub event_id: Option<i32>,
}
