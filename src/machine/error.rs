//! Execution errors.

use crate::config::HookError;
use std::fmt;
use thiserror::Error;

/// Which lifecycle hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// State entry hook.
    Enter,
    /// State exit hook.
    Exit,
    /// Event trigger hook.
    Trigger,
    /// Transition resolver.
    Transition,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookStage::Enter => "entry",
            HookStage::Exit => "exit",
            HookStage::Trigger => "trigger",
            HookStage::Transition => "transition",
        };
        f.write_str(name)
    }
}

/// Errors raised by [`Machine`](super::Machine) operations.
///
/// All variants are unrecoverable for the current call only: after an
/// [`Unhandled`], [`Ambiguous`] or [`Busy`] error the machine's state is
/// untouched and the caller may fire a different event. A failing hook
/// ([`Hook`]) propagates as-is; side effects already performed by earlier
/// hooks of the same call are not rolled back.
///
/// [`Unhandled`]: MachineError::Unhandled
/// [`Ambiguous`]: MachineError::Ambiguous
/// [`Busy`]: MachineError::Busy
/// [`Hook`]: MachineError::Hook
#[derive(Debug, Error)]
pub enum MachineError {
    /// No filter-passing transition candidate matched the event.
    #[error("unexpected event '{event}' in state '{state}': no transition defined")]
    Unhandled { state: String, event: String },

    /// Two or more top-ranked transition candidates compared equal.
    #[error("unexpected event '{event}' in state '{state}': {count} transitions rank equally")]
    Ambiguous {
        state: String,
        event: String,
        count: usize,
    },

    /// Another operation is in flight on this machine, either from a
    /// concurrent caller or from a hook firing into its own machine.
    #[error("an operation is already in flight on this machine")]
    Busy,

    /// A state or event value reported a kind name the graph does not know.
    #[error("kind '{name}' is not registered in the kind graph")]
    UnknownKind { name: String },

    /// A user hook failed; the concurrency guard was released normally.
    #[error("{stage} hook failed")]
    Hook {
        stage: HookStage,
        #[source]
        source: HookError,
    },
}
