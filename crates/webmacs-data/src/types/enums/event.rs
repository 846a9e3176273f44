//! `Event.type` — §3.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The kind of channel an [`Event`](crate::model::Event) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::EventType"]
pub enum EventType {
    #[db_rename = "sensor"]
    #[serde(rename = "sensor")]
    Sensor,
    #[db_rename = "actuator"]
    #[serde(rename = "actuator")]
    Actuator,
    #[db_rename = "range"]
    #[serde(rename = "range")]
    Range,
    #[db_rename = "cmd_button"]
    #[serde(rename = "cmd_button")]
    CmdButton,
    #[db_rename = "cmd_opened"]
    #[serde(rename = "cmd_opened")]
    CmdOpened,
    #[db_rename = "cmd_closed"]
    #[serde(rename = "cmd_closed")]
    CmdClosed,
}
