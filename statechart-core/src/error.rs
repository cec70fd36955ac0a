use thiserror::Error;

use crate::model::{ActionName, ConditionName, EventName, StateName};

/// Configuration errors detected while constructing an `Engine` (§7.1).
///
/// These are fatal and always caught eagerly, at construction — never
/// during `step`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate state name: {0:?}")]
    DuplicateState(StateName),

    #[error("transition on state {source:?} for event {event:?} targets unknown state {target:?}")]
    DanglingTarget {
        source: StateName,
        event: EventName,
        target: StateName,
    },

    #[error("action {0:?} is referenced but has no implementation")]
    MissingAction(ActionName),

    #[error("condition {0:?} is referenced but has no implementation")]
    MissingCondition(ConditionName),
}
