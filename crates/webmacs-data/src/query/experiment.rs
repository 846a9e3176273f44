//! Experiment repository — §3, §4.F step 2.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{Experiment, ExperimentChangeset, NewExperiment};
use crate::schema;
use crate::types::OffsetPagination;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExperimentRepository;

impl ExperimentRepository {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        experiment: NewExperiment,
    ) -> PgResult<Experiment> {
        use schema::experiments;

        diesel::insert_into(experiments::table)
            .values(&experiment)
            .returning(Experiment::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    /// The single experiment with `stopped_on = null`, if any — "the
    /// active experiment" (§3 invariant).
    pub async fn find_active(conn: &mut AsyncPgConnection) -> PgResult<Option<Experiment>> {
        use schema::experiments::dsl::*;

        experiments
            .filter(stopped_on.is_null())
            .select(Experiment::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        experiment_public_id: Uuid,
    ) -> PgResult<Experiment> {
        use schema::experiments::dsl::*;

        experiments
            .filter(public_id.eq(experiment_public_id))
            .select(Experiment::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    pub async fn list(
        conn: &mut AsyncPgConnection,
        pagination: OffsetPagination,
    ) -> PgResult<(Vec<Experiment>, i64)> {
        use schema::experiments::dsl::*;

        let total = experiments
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(PgError::from)?;
        let data = experiments
            .order(id.desc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .select(Experiment::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok((data, total))
    }

    /// Stops the active experiment, the sole terminal transition in its
    /// lifecycle (§3).
    pub async fn stop(
        conn: &mut AsyncPgConnection,
        experiment_public_id: Uuid,
        stopped_on: Timestamp,
    ) -> PgResult<Experiment> {
        Self::update(
            conn,
            experiment_public_id,
            ExperimentChangeset {
                stopped_on: Some(stopped_on),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        experiment_public_id: Uuid,
        changeset: ExperimentChangeset,
    ) -> PgResult<Experiment> {
        use schema::experiments::dsl::*;

        diesel::update(experiments.filter(public_id.eq(experiment_public_id)))
            .set(&changeset)
            .returning(Experiment::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }
}
