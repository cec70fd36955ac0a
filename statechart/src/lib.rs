//! A hierarchical statechart execution engine.
//!
//! Callers build a state tree (directly, or by loading an SCXML subset with
//! [`parse_scxml`]), construct an [`Engine`] from it plus name-keyed tables
//! of [`Action`]s and [`Condition`]s, and then drive it by enqueuing
//! [`Event`]s into a runner:
//!
//! - [`SyncRunner`] — a FIFO queue drained by explicit caller ticks.
//! - [`AsyncRunner`] — a FIFO queue drained by a single cooperative `tokio`
//!   task, with an orderly shutdown protocol.
//!
//! The engine itself is not thread-safe and not reentrant: [`Engine::step`]
//! mutates the current configuration and must not be called from within one
//! of its own actions.

pub mod core {
    pub use statechart_core::*;
}

pub use statechart_core::{
    ActionName, ConditionName, ConfigError, Event, EventName, State, StateName, Transition,
};

mod dot;
mod engine;
mod runner;
mod scxml;

pub use dot::render_dot;
pub use engine::{Action, ActionTable, Condition, ConditionTable, Engine};
pub use runner::{AsyncRunner, AsyncEngineHandle, RunnerClosed, SyncEngineHandle, SyncRunner};
pub use scxml::{parse_scxml, ScxmlError};
