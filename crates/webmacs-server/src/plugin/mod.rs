//! Thin handler-facing wrapper over the plugin/channel registry (§4.I).

use diesel_async::AsyncPgConnection;
use uuid::Uuid;
use webmacs_data::query::PluginRegistry;
use webmacs_data::PgResult;

/// Of `candidates`, returns the subset linked via some `ChannelMapping`
/// whose plugin instance is currently enabled. Used by the ingestion
/// pipeline's first filtering step (§4.F step 1).
pub async fn active_event_ids(
    conn: &mut AsyncPgConnection,
    candidates: &[Uuid],
) -> PgResult<std::collections::HashSet<Uuid>> {
    PluginRegistry::active_event_ids(conn, candidates).await
}

#[cfg(test)]
mod tests {
    // active_event_ids is a single-query pass-through; coverage lives with
    // webmacs-data's own PluginRegistry tests.
}
