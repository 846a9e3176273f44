//! Datapoint repository — §4.F, §4.B, §6 `/datapoints/latest`.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{Datapoint, DatapointWithEvent, NewDatapoint};
use crate::schema;

#[derive(Debug, Default, Clone, Copy)]
pub struct DatapointRepository;

impl DatapointRepository {
    /// Bulk-inserts all accepted datapoints in a single statement (§4.F
    /// step 3). Returns the inserted rows in the same order as `rows`.
    pub async fn bulk_insert(
        conn: &mut AsyncPgConnection,
        rows: &[NewDatapoint],
    ) -> PgResult<Vec<Datapoint>> {
        use schema::datapoints;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        diesel::insert_into(datapoints::table)
            .values(rows)
            .returning(Datapoint::as_returning())
            .get_results(conn)
            .await
            .map_err(PgError::from)
    }

    /// One row per event: the most recent datapoint, joined against its
    /// event's `public_id` (§6 `GET /datapoints/latest`).
    pub async fn latest_per_event(
        conn: &mut AsyncPgConnection,
    ) -> PgResult<Vec<DatapointWithEvent>> {
        use schema::{datapoints, events, experiments};

        let rows = datapoints::table
            .inner_join(events::table)
            .left_join(experiments::table)
            .distinct_on(datapoints::event_id)
            .order((datapoints::event_id, datapoints::timestamp.desc()))
            .select((
                datapoints::value,
                events::public_id,
                datapoints::timestamp,
                experiments::public_id.nullable(),
            ))
            .load::<(f64, Uuid, jiff_diesel::Timestamp, Option<Uuid>)>(conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows
            .into_iter()
            .map(
                |(value, event_public_id, timestamp, experiment_public_id)| DatapointWithEvent {
                    value,
                    event_public_id,
                    timestamp,
                    experiment_public_id,
                },
            )
            .collect())
    }

    /// Timestamp of the single most recent datapoint across every event,
    /// or `None` if the table is empty (§6 `GET /health`'s `last_datapoint`).
    pub async fn most_recent_timestamp(
        conn: &mut AsyncPgConnection,
    ) -> PgResult<Option<jiff_diesel::Timestamp>> {
        use schema::datapoints::dsl::*;

        datapoints
            .select(timestamp)
            .order(timestamp.desc())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    pub async fn delete_for_event_ids(
        conn: &mut AsyncPgConnection,
        event_ids: &[i32],
    ) -> PgResult<usize> {
        use schema::datapoints;

        if event_ids.is_empty() {
            return Ok(0);
        }

        diesel::delete(datapoints::table.filter(datapoints::event_id.eq_any(event_ids)))
            .execute(conn)
            .await
            .map_err(PgError::from)
    }
}
