//! Kindred: a hierarchical, kind-dispatched state machine engine.
//!
//! States and events carry *kinds*, tags in an explicit subtype graph,
//! and behavior can be attached at any level of that hierarchy. When an
//! event fires, the engine resolves every rule whose declared kinds match
//! the concrete (state, event) pair, runs all of their trigger hooks from
//! the most general scope to the most specific, and lets exactly one
//! best-ranked rule perform the transition. Overlap is resolved by
//! specificity distance; genuine ties and unhandled events surface as
//! distinct, catchable errors before any side effect runs.
//!
//! # Core Concepts
//!
//! - **[`KindGraph`]**: the subtype lattice, declared once up front
//! - **[`Kinded`]**: trait linking state/event values to their kinds
//! - **[`Configurator`]** / **[`Config`]**: mutable authoring surface and
//!   the frozen snapshot machines execute against
//! - **[`Machine`]**: owns current state and context, serializes execution
//!
//! # Example
//!
//! ```rust
//! use kindred::{Configurator, KindGraph, Kinded, Machine};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Door {
//!     Closed { locked: bool },
//!     Open,
//! }
//!
//! impl Kinded for Door {
//!     fn kind(&self) -> &str {
//!         match self {
//!             Self::Closed { .. } => "Closed",
//!             Self::Open => "Open",
//!         }
//!     }
//! }
//!
//! #[derive(Debug)]
//! enum DoorEvent {
//!     Unlock,
//!     OpenUp,
//! }
//!
//! impl Kinded for DoorEvent {
//!     fn kind(&self) -> &str {
//!         match self {
//!             Self::Unlock => "Unlock",
//!             Self::OpenUp => "OpenUp",
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = KindGraph::new();
//!     let door = graph.class("Door")?;
//!     let closed = graph.subclass("Closed", door)?;
//!     let _open = graph.subclass("Open", door)?;
//!     let unlock = graph.class("Unlock")?;
//!     let open_up = graph.class("OpenUp")?;
//!
//!     let mut cfg = Configurator::<(), Door, DoorEvent>::new(graph);
//!     // Unlocking works in any door state.
//!     cfg.event(door, unlock)
//!         .filter(|_, state, _| matches!(state, Door::Closed { locked: true }))?
//!         .loops(|_, _, _| Ok(Door::Closed { locked: false }))?;
//!     // Opening is declared against the closed state only.
//!     cfg.event(closed, open_up)
//!         .filter(|_, state, _| matches!(state, Door::Closed { locked: false }))?
//!         .goes(|_, _, _| Ok(Door::Open))?;
//!
//!     let machine = Machine::new(cfg.freeze(), (), Door::Closed { locked: true })?;
//!     machine.fire(DoorEvent::Unlock)?;
//!     machine.fire(DoorEvent::OpenUp)?;
//!     assert_eq!(machine.state()?, Door::Open);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod kind;
pub mod machine;

// Re-export commonly used types
pub use config::{Config, ConfigError, Configurator, EventRule, HookError, HookResult, StateRule};
pub use kind::{GraphError, Kind, KindGraph, Kinded};
pub use machine::{HookStage, Machine, MachineError};
