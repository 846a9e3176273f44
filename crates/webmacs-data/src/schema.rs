// Diesel schema for the WebMACS persistence gateway.
//
// Hand-maintained to match the migrations an external collaborator owns
// (database schema migrations are out of scope for this core); kept in the
// same `sql_types` + `table!` shape Diesel CLI would generate.

pub mod sql_types {
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "event_type"))]
    pub struct EventType;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "plugin_instance_status"))]
    pub struct PluginInstanceStatus;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "channel_direction"))]
    pub struct ChannelDirection;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "rule_operator"))]
    pub struct RuleOperator;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "rule_action_type"))]
    pub struct RuleActionType;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "webhook_delivery_status"))]
    pub struct WebhookDeliveryStatus;

    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "firmware_status"))]
    pub struct FirmwareStatus;
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::EventType;

    events (id) {
        id -> Int4,
        public_id -> Uuid,
        name -> Text,
        min_value -> Nullable<Float8>,
        max_value -> Nullable<Float8>,
        unit -> Nullable<Text>,
        event_type -> EventType,
        owner_id -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    experiments (id) {
        id -> Int4,
        public_id -> Uuid,
        name -> Text,
        started_on -> Timestamptz,
        stopped_on -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    datapoints (id) {
        id -> Int8,
        public_id -> Uuid,
        value -> Float8,
        timestamp -> Timestamptz,
        event_id -> Int4,
        experiment_id -> Nullable<Int4>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::PluginInstanceStatus;

    plugin_instances (id) {
        id -> Int4,
        public_id -> Uuid,
        plugin_id -> Text,
        instance_name -> Text,
        demo_mode -> Bool,
        enabled -> Bool,
        status -> PluginInstanceStatus,
        config -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::ChannelDirection;

    channel_mappings (id) {
        id -> Int4,
        public_id -> Uuid,
        plugin_instance_id -> Int4,
        channel_id -> Text,
        channel_name -> Text,
        direction -> ChannelDirection,
        unit -> Nullable<Text>,
        event_id -> Nullable<Int4>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::{RuleOperator, RuleActionType};

    rules (id) {
        id -> Int4,
        public_id -> Uuid,
        name -> Text,
        event_id -> Int4,
        operator -> RuleOperator,
        threshold -> Float8,
        threshold_high -> Nullable<Float8>,
        action_type -> RuleActionType,
        webhook_event_type -> Nullable<Text>,
        enabled -> Bool,
        cooldown_seconds -> Int4,
        last_triggered_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    webhooks (id) {
        id -> Int4,
        public_id -> Uuid,
        url -> Text,
        secret -> Nullable<Text>,
        events -> Jsonb,
        enabled -> Bool,
        owner_id -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::WebhookDeliveryStatus;

    webhook_deliveries (id) {
        id -> Int8,
        public_id -> Uuid,
        webhook_id -> Int4,
        event_type -> Text,
        payload -> Jsonb,
        status -> WebhookDeliveryStatus,
        attempts -> Int4,
        last_status_code -> Nullable<Int4>,
        last_error -> Nullable<Text>,
        delivered_on -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::FirmwareStatus;

    firmware_updates (id) {
        id -> Int4,
        public_id -> Uuid,
        version -> Text,
        changelog -> Nullable<Text>,
        status -> FirmwareStatus,
        file_path -> Nullable<Text>,
        file_hash_sha256 -> Nullable<Text>,
        file_size_bytes -> Nullable<Int8>,
        started_on -> Nullable<Timestamptz>,
        completed_on -> Nullable<Timestamptz>,
        error_message -> Nullable<Text>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    users (id) {
        id -> Int4,
        public_id -> Uuid,
        email -> Text,
        password_hash -> Text,
        role -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    api_tokens (id) {
        id -> Int4,
        public_id -> Uuid,
        user_id -> Int4,
        token_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    dashboards (id) {
        id -> Int4,
        public_id -> Uuid,
        user_id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    dashboard_widgets (id) {
        id -> Int4,
        public_id -> Uuid,
        dashboard_id -> Int4,
        event_id -> Nullable<Int4>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    log_entries (id) {
        id -> Int8,
        public_id -> Uuid,
        user_id -> Nullable<Int4>,
        level -> Text,
        message -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    blacklist_tokens (id) {
        id -> Int4,
        public_id -> Uuid,
        token_hash -> Text,
        blacklisted_on -> Timestamptz,
    }
}

diesel::joinable!(datapoints -> events (event_id));
diesel::joinable!(datapoints -> experiments (experiment_id));
diesel::joinable!(channel_mappings -> plugin_instances (plugin_instance_id));
diesel::joinable!(channel_mappings -> events (event_id));
diesel::joinable!(rules -> events (event_id));
diesel::joinable!(webhook_deliveries -> webhooks (webhook_id));
diesel::joinable!(dashboard_widgets -> dashboards (dashboard_id));
diesel::joinable!(dashboard_widgets -> events (event_id));
diesel::joinable!(api_tokens -> users (user_id));
diesel::joinable!(dashboards -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    events,
    experiments,
    datapoints,
    plugin_instances,
    channel_mappings,
    rules,
    webhooks,
    webhook_deliveries,
    firmware_updates,
    users,
    api_tokens,
    dashboards,
    dashboard_widgets,
    log_entries,
    blacklist_tokens,
);
