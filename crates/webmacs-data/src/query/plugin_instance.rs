//! PluginInstance and ChannelMapping repositories — §3, §4.I.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{
    ChannelMapping, NewChannelMapping, NewPluginInstance, PluginInstance,
    PluginInstanceChangeset,
};
use crate::schema;
use crate::types::OffsetPagination;

#[derive(Debug, Default, Clone, Copy)]
pub struct PluginInstanceRepository;

impl PluginInstanceRepository {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        instance: NewPluginInstance,
    ) -> PgResult<PluginInstance> {
        use schema::plugin_instances;

        diesel::insert_into(plugin_instances::table)
            .values(&instance)
            .returning(PluginInstance::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        instance_public_id: Uuid,
    ) -> PgResult<PluginInstance> {
        use schema::plugin_instances::dsl::*;

        plugin_instances
            .filter(public_id.eq(instance_public_id))
            .select(PluginInstance::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    pub async fn list(
        conn: &mut AsyncPgConnection,
        pagination: OffsetPagination,
    ) -> PgResult<(Vec<PluginInstance>, i64)> {
        use schema::plugin_instances::dsl::*;

        let total = plugin_instances
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(PgError::from)?;
        let data = plugin_instances
            .order(id.asc())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .select(PluginInstance::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok((data, total))
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        instance_public_id: Uuid,
        changeset: PluginInstanceChangeset,
    ) -> PgResult<PluginInstance> {
        use schema::plugin_instances::dsl::*;

        diesel::update(plugin_instances.filter(public_id.eq(instance_public_id)))
            .set(&changeset)
            .returning(PluginInstance::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Deletes a plugin instance with the two-phase cleanup required by §3:
    /// null `ChannelMapping.event` references, delete `Rule`s referencing
    /// those events, null `DashboardWidget.event` references, bulk-delete
    /// `Datapoint`s for those events, delete the `Event`s themselves, then
    /// delete the instance (which cascades its own mappings).
    pub async fn delete(
        conn: &mut AsyncPgConnection,
        instance_public_id: Uuid,
    ) -> PgResult<()> {
        use schema::{channel_mappings, dashboard_widgets, datapoints, events, plugin_instances, rules};

        let instance = Self::find_by_public_id(conn, instance_public_id).await?;

        let event_ids: Vec<i32> = channel_mappings::table
            .filter(channel_mappings::plugin_instance_id.eq(instance.id))
            .filter(channel_mappings::event_id.is_not_null())
            .select(channel_mappings::event_id.assume_not_null())
            .load(conn)
            .await
            .map_err(PgError::from)?;

        diesel::update(
            channel_mappings::table.filter(channel_mappings::plugin_instance_id.eq(instance.id)),
        )
        .set(channel_mappings::event_id.eq(None::<i32>))
        .execute(conn)
        .await
        .map_err(PgError::from)?;

        if !event_ids.is_empty() {
            diesel::delete(rules::table.filter(rules::event_id.eq_any(&event_ids)))
                .execute(conn)
                .await
                .map_err(PgError::from)?;

            diesel::update(
                dashboard_widgets::table.filter(dashboard_widgets::event_id.eq_any(&event_ids)),
            )
            .set(dashboard_widgets::event_id.eq(None::<i32>))
            .execute(conn)
            .await
            .map_err(PgError::from)?;

            diesel::delete(datapoints::table.filter(datapoints::event_id.eq_any(&event_ids)))
                .execute(conn)
                .await
                .map_err(PgError::from)?;

            diesel::delete(events::table.filter(events::id.eq_any(&event_ids)))
                .execute(conn)
                .await
                .map_err(PgError::from)?;
        }

        let affected =
            diesel::delete(plugin_instances::table.filter(plugin_instances::id.eq(instance.id)))
                .execute(conn)
                .await
                .map_err(PgError::from)?;

        if affected == 0 {
            return Err(PgError::NotFound);
        }
        Ok(())
    }
}

/// Database operations for [`ChannelMapping`] records.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChannelMappingRepository;

impl ChannelMappingRepository {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        mapping: NewChannelMapping,
    ) -> PgResult<ChannelMapping> {
        use schema::channel_mappings;

        diesel::insert_into(channel_mappings::table)
            .values(&mapping)
            .returning(ChannelMapping::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn list_for_instance(
        conn: &mut AsyncPgConnection,
        instance_id: i32,
    ) -> PgResult<Vec<ChannelMapping>> {
        use schema::channel_mappings::dsl::*;

        channel_mappings
            .filter(plugin_instance_id.eq(instance_id))
            .select(ChannelMapping::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }
}

/// §4.I: the gateway that answers "which of these events are currently
/// live" for the ingestion pipeline's filtering step.
#[derive(Debug, Default, Clone, Copy)]
pub struct PluginRegistry;

impl PluginRegistry {
    /// Returns the subset of `candidates` that are both linked via some
    /// `ChannelMapping` and whose mapping's plugin instance has
    /// `enabled = true`.
    pub async fn active_event_ids(
        conn: &mut AsyncPgConnection,
        candidates: &[Uuid],
    ) -> PgResult<std::collections::HashSet<Uuid>> {
        use schema::{channel_mappings, events, plugin_instances};

        if candidates.is_empty() {
            return Ok(std::collections::HashSet::new());
        }

        let active: Vec<Uuid> = events::table
            .inner_join(channel_mappings::table)
            .inner_join(
                plugin_instances::table
                    .on(plugin_instances::id.eq(channel_mappings::plugin_instance_id)),
            )
            .filter(plugin_instances::enabled.eq(true))
            .filter(events::public_id.eq_any(candidates))
            .select(events::public_id)
            .distinct()
            .load(conn)
            .await
            .map_err(PgError::from)?;

        Ok(active.into_iter().collect())
    }
}
