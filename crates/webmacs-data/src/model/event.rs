//! Event model — §3.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::events;
use crate::types::EventType;

/// A named sensor/actuator channel.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Event {
    pub id: i32,
    pub public_id: Uuid,
    pub name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
    pub event_type: EventType,
    pub owner_id: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data required to create a new [`Event`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEvent {
    pub public_id: Uuid,
    pub name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
    pub event_type: EventType,
    pub owner_id: Option<i32>,
}

/// Sparse update for an existing [`Event`]; only `Some` fields are written
/// (§4.B partial update).
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventChangeset {
    pub name: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
    pub event_type: Option<EventType>,
    pub updated_at: Option<Timestamp>,
}
