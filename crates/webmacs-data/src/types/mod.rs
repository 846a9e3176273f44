//! Value types shared across models and queries.

pub mod constraint;
pub mod enums;
pub mod pagination;

pub use constraint::ConstraintViolation;
pub use enums::{
    ChannelDirection, EventType, FirmwareStatus, PluginInstanceStatus, RuleActionType,
    RuleOperator, WebhookDeliveryStatus,
};
pub use pagination::{OffsetPage, OffsetPagination};
