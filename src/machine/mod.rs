//! Execution core: rule cache, ranking, lifecycle and concurrency guard.
//!
//! A [`Machine`] pairs a frozen [`Config`](crate::Config) with one current
//! state value and one context value. Each fired event resolves, through
//! the per-machine rule cache, which of the possibly overlapping rules
//! apply, runs their triggers general-to-specific, and lets exactly one
//! best-ranked rule perform the transition, failing loudly on unhandled
//! events and on ambiguity before any side effect.

mod cache;
mod error;
mod executor;

pub use error::{HookStage, MachineError};
pub use executor::Machine;
