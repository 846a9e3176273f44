//! `WebhookDelivery.status` — §4.D.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of a single webhook delivery attempt series.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::WebhookDeliveryStatus"]
pub enum WebhookDeliveryStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,
    #[db_rename = "delivered"]
    #[serde(rename = "delivered")]
    Delivered,
    #[db_rename = "dead_letter"]
    #[serde(rename = "dead_letter")]
    DeadLetter,
}

impl WebhookDeliveryStatus {
    /// Whether this status is terminal (§8 property 5).
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::DeadLetter)
    }
}
