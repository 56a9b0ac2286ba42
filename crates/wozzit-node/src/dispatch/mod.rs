//! Dispatch engine exports.
//!
//! Re-exports the dispatcher, the rule model, and the matcher so downstream
//! consumers can depend on this module directly.

mod actions;
pub mod dispatcher;
pub mod matcher;
pub mod rule;

pub use dispatcher::{Adapters, Dispatcher};
pub use matcher::matches;
pub use rule::{Action, ActionKind, ActionRule, Callback, EmailAction, MatchCriteria, MatchField};
