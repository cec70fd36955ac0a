//! Core value types for the statechart hierarchical statechart engine.
//!
//! This crate holds only the immutable data model (`State`, `Transition`,
//! `Event`, the name aliases) and the configuration-error taxonomy. The
//! engine, runners, SCXML loader and DOT renderer live in the `statechart`
//! crate, which depends on this one.

mod error;
mod event;
mod model;

pub use error::ConfigError;
pub use event::Event;
pub use model::{ActionName, ConditionName, EventName, State, StateName, Transition};
