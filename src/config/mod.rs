//! Configuration model: authoring and frozen rule sets.
//!
//! Authoring and execution are two distinct types. A [`Configurator`] owns
//! exclusive write access while rules are declared; [`freeze`] consumes it
//! and produces an immutable [`Config`] snapshot, so a running machine can
//! never observe later mutation. The freeze is enforced by the type system,
//! not by convention.
//!
//! Rules come in two shapes:
//!
//! - [`StateRule`]: entry/exit hooks declared against one state kind; at
//!   most one rule per declared kind (lookups are idempotent).
//! - [`EventRule`]: filter/trigger/transition declared against a
//!   (state kind, event kind) pair; every declaration appends a fresh,
//!   independent rule and declaration order is semantically significant.
//!
//! Single-value fields are set-once: a second assignment is a
//! [`ConfigError::Redefinition`] and leaves the existing value intact.
//!
//! [`freeze`]: Configurator::freeze

mod configurator;
mod error;
mod frozen;
pub(crate) mod rules;

pub use configurator::{Configurator, EventRuleMut, StateRuleMut};
pub use error::ConfigError;
pub use frozen::Config;
pub use rules::{EventRule, HookError, HookResult, StateRule};
