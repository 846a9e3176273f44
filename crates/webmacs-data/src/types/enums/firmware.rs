//! `FirmwareUpdate.status` and its allowed-transition table — §4.H.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of a [`FirmwareUpdate`](crate::model::FirmwareUpdate).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::FirmwareStatus"]
pub enum FirmwareStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,
    #[db_rename = "downloading"]
    #[serde(rename = "downloading")]
    Downloading,
    #[db_rename = "verifying"]
    #[serde(rename = "verifying")]
    Verifying,
    #[db_rename = "applying"]
    #[serde(rename = "applying")]
    Applying,
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    Failed,
    #[db_rename = "rolled_back"]
    #[serde(rename = "rolled_back")]
    RolledBack,
}

/// The exact transition table from §4.H: source state → allowed target
/// states. Any pair not listed here is rejected.
const ALLOWED_TRANSITIONS: &[(FirmwareStatus, &[FirmwareStatus])] = &[
    (
        FirmwareStatus::Pending,
        &[
            FirmwareStatus::Downloading,
            FirmwareStatus::Completed,
            FirmwareStatus::Failed,
        ],
    ),
    (
        FirmwareStatus::Downloading,
        &[FirmwareStatus::Verifying, FirmwareStatus::Failed],
    ),
    (
        FirmwareStatus::Verifying,
        &[FirmwareStatus::Applying, FirmwareStatus::Failed],
    ),
    (
        FirmwareStatus::Applying,
        &[FirmwareStatus::Completed, FirmwareStatus::Failed],
    ),
    (FirmwareStatus::Completed, &[FirmwareStatus::RolledBack]),
    (FirmwareStatus::Failed, &[FirmwareStatus::Pending]),
    (FirmwareStatus::RolledBack, &[FirmwareStatus::Pending]),
];

impl FirmwareStatus {
    /// Whether a transition from `self` to `target` is permitted (§4.H,
    /// §8 property 7).
    pub fn can_transition_to(self, target: FirmwareStatus) -> bool {
        ALLOWED_TRANSITIONS
            .iter()
            .find(|(src, _)| *src == self)
            .is_some_and(|(_, targets)| targets.contains(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn exhaustive_transition_table_matches_spec() {
        for src in FirmwareStatus::iter() {
            for tgt in FirmwareStatus::iter() {
                let expected = ALLOWED_TRANSITIONS
                    .iter()
                    .find(|(s, _)| *s == src)
                    .is_some_and(|(_, targets)| targets.contains(&tgt));
                assert_eq!(
                    src.can_transition_to(tgt),
                    expected,
                    "{src:?} -> {tgt:?} mismatch"
                );
            }
        }
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for state in FirmwareStatus::iter() {
            assert!(!state.can_transition_to(state), "{state:?} -> self");
        }
    }

    #[test]
    fn pending_allows_direct_completion() {
        assert!(FirmwareStatus::Pending.can_transition_to(FirmwareStatus::Completed));
    }

    #[test]
    fn completed_cannot_go_back_to_pending_directly() {
        assert!(!FirmwareStatus::Completed.can_transition_to(FirmwareStatus::Pending));
    }
}
