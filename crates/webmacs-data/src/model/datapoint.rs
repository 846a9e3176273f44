//! Datapoint model — §3, §4.F.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::datapoints;

/// A single reading, never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = datapoints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Datapoint {
    pub id: i64,
    pub public_id: Uuid,
    pub value: f64,
    pub timestamp: Timestamp,
    pub event_id: i32,
    pub experiment_id: Option<i32>,
}

/// A single row for the bulk-insert path (§4.F step 3).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = datapoints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDatapoint {
    pub public_id: Uuid,
    pub value: f64,
    pub timestamp: Timestamp,
    pub event_id: i32,
    pub experiment_id: Option<i32>,
}

/// A row joined against its owning event, for the `/datapoints/latest`
/// and broadcast shapes (§6).
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct DatapointWithEvent {
    pub value: f64,
    pub event_public_id: Uuid,
    pub timestamp: Timestamp,
    pub experiment_public_id: Option<Uuid>,
}
