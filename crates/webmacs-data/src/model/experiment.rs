//! Experiment model — §3.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::experiments;

/// A time-bounded measurement session.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = experiments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Experiment {
    pub id: i32,
    pub public_id: Uuid,
    pub name: String,
    pub started_on: Timestamp,
    pub stopped_on: Option<Timestamp>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = experiments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewExperiment {
    pub public_id: Uuid,
    pub name: String,
    pub started_on: Timestamp,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = experiments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExperimentChangeset {
    pub name: Option<String>,
    pub stopped_on: Option<Timestamp>,
}
