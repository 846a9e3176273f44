//! FirmwareUpdate model — §4.H.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::firmware_updates;
use crate::types::FirmwareStatus;

/// A registered firmware version and its OTA lifecycle state.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = firmware_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FirmwareUpdate {
    pub id: i32,
    pub public_id: Uuid,
    pub version: String,
    pub changelog: Option<String>,
    pub status: FirmwareStatus,
    pub file_path: Option<String>,
    pub file_hash_sha256: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub started_on: Option<Timestamp>,
    pub completed_on: Option<Timestamp>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = firmware_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFirmwareUpdate {
    pub public_id: Uuid,
    pub version: String,
    pub changelog: Option<String>,
    pub status: FirmwareStatus,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = firmware_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FirmwareUpdateChangeset {
    pub status: Option<FirmwareStatus>,
    pub file_path: Option<String>,
    pub file_hash_sha256: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub started_on: Option<Timestamp>,
    pub completed_on: Option<Timestamp>,
    pub error_message: Option<String>,
}
