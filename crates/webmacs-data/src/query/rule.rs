//! Rule repository — §4.E.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{NewRule, Rule, RuleChangeset};
use crate::schema;
use crate::types::OffsetPagination;

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleRepository;

impl RuleRepository {
    pub async fn create(conn: &mut AsyncPgConnection, rule: NewRule) -> PgResult<Rule> {
        use schema::rules;

        diesel::insert_into(rules::table)
            .values(&rule)
            .returning(Rule::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        rule_public_id: Uuid,
    ) -> PgResult<Rule> {
        use schema::rules::dsl::*;

        rules
            .filter(public_id.eq(rule_public_id))
            .select(Rule::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    pub async fn list(
        conn: &mut AsyncPgConnection,
        pagination: OffsetPagination,
    ) -> PgResult<(Vec<Rule>, i64)> {
        use schema::rules::dsl::*;

        let total = rules.count().get_result::<i64>(conn).await.map_err(PgError::from)?;
        let data = rules
            .order(id.asc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .select(Rule::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok((data, total))
    }

    /// Enabled rules that target the event with the given internal id
    /// (§4.E step 1: "fetch all enabled rules for the event_public_id").
    pub async fn find_enabled_for_event(
        conn: &mut AsyncPgConnection,
        event_id_value: i32,
    ) -> PgResult<Vec<Rule>> {
        use schema::rules::dsl::*;

        rules
            .filter(event_id.eq(event_id_value))
            .filter(enabled.eq(true))
            .select(Rule::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        rule_public_id: Uuid,
        changeset: RuleChangeset,
    ) -> PgResult<Rule> {
        use schema::rules::dsl::*;

        diesel::update(rules.filter(public_id.eq(rule_public_id)))
            .set(&changeset)
            .returning(Rule::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Flushes `last_triggered_at` immediately, closing the cooldown race
    /// before the rule's action fires (§4.E step 2c, §5 ordering
    /// guarantees).
    pub async fn mark_triggered(
        conn: &mut AsyncPgConnection,
        rule_id: i32,
        now: Timestamp,
    ) -> PgResult<()> {
        use schema::rules::dsl::*;

        diesel::update(rules.filter(id.eq(rule_id)))
            .set(last_triggered_at.eq(Some(now)))
            .execute(conn)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }
}
