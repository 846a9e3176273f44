//! Event repository — §3, §4.B.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{Event, EventChangeset, NewEvent};
use crate::schema;
use crate::types::OffsetPagination;

/// Database operations for [`Event`] records.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventRepository;

impl EventRepository {
    pub async fn create(conn: &mut AsyncPgConnection, event: NewEvent) -> PgResult<Event> {
        use schema::events;

        diesel::insert_into(events::table)
            .values(&event)
            .returning(Event::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    /// Fetches an event by `public_id`, or [`PgError::NotFound`].
    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        event_public_id: Uuid,
    ) -> PgResult<Event> {
        use schema::events::dsl::*;

        events
            .filter(public_id.eq(event_public_id))
            .select(Event::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    pub async fn list(
        conn: &mut AsyncPgConnection,
        pagination: OffsetPagination,
    ) -> PgResult<(Vec<Event>, i64)> {
        use schema::events::dsl::*;

        let total = events.count().get_result::<i64>(conn).await.map_err(PgError::from)?;
        let data = events
            .order(id.asc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .select(Event::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok((data, total))
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        event_public_id: Uuid,
        changeset: EventChangeset,
    ) -> PgResult<Event> {
        use schema::events::dsl::*;

        diesel::update(events.filter(public_id.eq(event_public_id)))
            .set(&changeset)
            .returning(Event::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Deletes an event and cascades per §3: datapoints for this event are
    /// removed, the experiment link on surviving datapoints is irrelevant
    /// (the row is gone), widget event links are nulled, and referencing
    /// rules are deleted.
    pub async fn delete(conn: &mut AsyncPgConnection, event_public_id: Uuid) -> PgResult<()> {
        use schema::{dashboard_widgets, datapoints, events, rules};

        let event = Self::find_by_public_id(conn, event_public_id).await?;

        diesel::delete(rules::table.filter(rules::event_id.eq(event.id)))
            .execute(conn)
            .await
            .map_err(PgError::from)?;

        diesel::update(dashboard_widgets::table.filter(dashboard_widgets::event_id.eq(event.id)))
            .set(dashboard_widgets::event_id.eq(None::<i32>))
            .execute(conn)
            .await
            .map_err(PgError::from)?;

        diesel::delete(datapoints::table.filter(datapoints::event_id.eq(event.id)))
            .execute(conn)
            .await
            .map_err(PgError::from)?;

        let affected = diesel::delete(events::table.filter(events::id.eq(event.id)))
            .execute(conn)
            .await
            .map_err(PgError::from)?;

        if affected == 0 {
            return Err(PgError::NotFound);
        }
        Ok(())
    }
}
