//! `Rule.operator` and `Rule.action_type` — §4.E.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The comparison a [`Rule`](crate::model::Rule) applies to an incoming value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::RuleOperator"]
pub enum RuleOperator {
    #[db_rename = "gt"]
    #[serde(rename = "gt")]
    Gt,
    #[db_rename = "lt"]
    #[serde(rename = "lt")]
    Lt,
    #[db_rename = "eq"]
    #[serde(rename = "eq")]
    Eq,
    #[db_rename = "gte"]
    #[serde(rename = "gte")]
    Gte,
    #[db_rename = "lte"]
    #[serde(rename = "lte")]
    Lte,
    #[db_rename = "between"]
    #[serde(rename = "between")]
    Between,
    #[db_rename = "not_between"]
    #[serde(rename = "not_between")]
    NotBetween,
}

impl RuleOperator {
    /// Whether this operator requires `threshold_high` to be present.
    pub const fn requires_threshold_high(self) -> bool {
        matches!(self, RuleOperator::Between | RuleOperator::NotBetween)
    }
}

/// What a triggered [`Rule`](crate::model::Rule) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::RuleActionType"]
pub enum RuleActionType {
    #[db_rename = "webhook"]
    #[serde(rename = "webhook")]
    Webhook,
    #[db_rename = "log"]
    #[serde(rename = "log")]
    Log,
}
