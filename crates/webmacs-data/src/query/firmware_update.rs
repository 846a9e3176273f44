//! FirmwareUpdate repository — §4.H.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{FirmwareUpdate, FirmwareUpdateChangeset, NewFirmwareUpdate};
use crate::schema;
use crate::types::FirmwareStatus;

#[derive(Debug, Default, Clone, Copy)]
pub struct FirmwareUpdateRepository;

impl FirmwareUpdateRepository {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        firmware: NewFirmwareUpdate,
    ) -> PgResult<FirmwareUpdate> {
        use schema::firmware_updates;

        diesel::insert_into(firmware_updates::table)
            .values(&firmware)
            .returning(FirmwareUpdate::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        firmware_public_id: Uuid,
    ) -> PgResult<FirmwareUpdate> {
        use schema::firmware_updates::dsl::*;

        firmware_updates
            .filter(public_id.eq(firmware_public_id))
            .select(FirmwareUpdate::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Firmware records in `pending` or `completed` status, for update
    /// discovery's local source (§4.H).
    pub async fn find_candidates(conn: &mut AsyncPgConnection) -> PgResult<Vec<FirmwareUpdate>> {
        use schema::firmware_updates::dsl::*;

        firmware_updates
            .filter(status.eq(FirmwareStatus::Pending).or(status.eq(FirmwareStatus::Completed)))
            .select(FirmwareUpdate::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        firmware_public_id: Uuid,
        changeset: FirmwareUpdateChangeset,
    ) -> PgResult<FirmwareUpdate> {
        use schema::firmware_updates::dsl::*;

        diesel::update(firmware_updates.filter(public_id.eq(firmware_public_id)))
            .set(&changeset)
            .returning(FirmwareUpdate::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }
}
