//! Rule model — §4.E.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::rules;
use crate::types::{RuleActionType, RuleOperator};

/// A threshold condition evaluated against incoming datapoints.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rule {
    pub id: i32,
    pub public_id: Uuid,
    pub name: String,
    pub event_id: i32,
    pub operator: RuleOperator,
    pub threshold: f64,
    pub threshold_high: Option<f64>,
    pub action_type: RuleActionType,
    pub webhook_event_type: Option<String>,
    pub enabled: bool,
    pub cooldown_seconds: i32,
    pub last_triggered_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRule {
    pub public_id: Uuid,
    pub name: String,
    pub event_id: i32,
    pub operator: RuleOperator,
    pub threshold: f64,
    pub threshold_high: Option<f64>,
    pub action_type: RuleActionType,
    pub webhook_event_type: Option<String>,
    pub enabled: bool,
    pub cooldown_seconds: i32,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RuleChangeset {
    pub name: Option<String>,
    pub operator: Option<RuleOperator>,
    pub threshold: Option<f64>,
    pub threshold_high: Option<f64>,
    pub action_type: Option<RuleActionType>,
    pub webhook_event_type: Option<String>,
    pub enabled: Option<bool>,
    pub cooldown_seconds: Option<i32>,
    pub last_triggered_at: Option<Timestamp>,
}
