//! Minimal models for the external-collaborator entities (§3, §6): only the
//! keys and reference directions the core's cascades and foreign keys need.
//! Their own CRUD, validation, and business rules are out of scope (§1).

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{api_tokens, blacklist_tokens, dashboard_widgets, dashboards, log_entries, users};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub public_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub public_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = api_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiToken {
    pub id: i32,
    pub public_id: Uuid,
    pub user_id: i32,
    pub token_hash: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = api_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewApiToken {
    pub public_id: Uuid,
    pub user_id: i32,
    pub token_hash: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = dashboards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Dashboard {
    pub id: i32,
    pub public_id: Uuid,
    pub user_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = dashboard_widgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DashboardWidget {
    pub id: i32,
    pub public_id: Uuid,
    pub dashboard_id: i32,
    pub event_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = log_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LogEntry {
    pub id: i64,
    pub public_id: Uuid,
    pub user_id: Option<i32>,
    pub level: String,
    pub message: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = log_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewLogEntry {
    pub public_id: Uuid,
    pub user_id: Option<i32>,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = blacklist_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlacklistToken {
    pub id: i32,
    pub public_id: Uuid,
    pub token_hash: String,
    pub blacklisted_on: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blacklist_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBlacklistToken {
    pub public_id: Uuid,
    pub token_hash: String,
    pub blacklisted_on: Timestamp,
}
