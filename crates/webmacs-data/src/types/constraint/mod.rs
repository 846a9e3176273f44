//! Typed mapping from Postgres unique-constraint names to the entity they
//! guard, so callers can raise [`webmacs_core::ErrorKind::Conflict`]
//! without string-matching at every call site.

use strum::{Display, EnumString};

/// A known unique-constraint violation, identified by its Postgres
/// constraint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ConstraintViolation {
    #[strum(serialize = "events_name_key")]
    EventName,
    #[strum(serialize = "experiments_name_key")]
    ExperimentName,
    #[strum(serialize = "plugin_instances_instance_name_key")]
    PluginInstanceName,
    #[strum(serialize = "channel_mappings_plugin_instance_id_channel_id_key")]
    ChannelMappingChannel,
    #[strum(serialize = "rules_name_key")]
    RuleName,
    #[strum(serialize = "webhooks_url_key")]
    WebhookUrl,
    #[strum(serialize = "firmware_updates_version_key")]
    FirmwareVersion,
    #[strum(serialize = "users_email_key")]
    UserEmail,
    #[strum(serialize = "api_tokens_token_hash_key")]
    ApiTokenHash,
    #[strum(serialize = "blacklist_tokens_token_hash_key")]
    BlacklistTokenHash,
}

impl ConstraintViolation {
    /// Attempts to recognize a raw Postgres constraint name.
    pub fn new(constraint_name: &str) -> Option<Self> {
        constraint_name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_known_constraints() {
        assert_eq!(
            ConstraintViolation::new("events_name_key"),
            Some(ConstraintViolation::EventName)
        );
        assert_eq!(
            ConstraintViolation::new("webhooks_url_key"),
            Some(ConstraintViolation::WebhookUrl)
        );
    }

    #[test]
    fn unknown_constraint_is_none() {
        assert_eq!(ConstraintViolation::new("not_a_real_constraint"), None);
    }
}
