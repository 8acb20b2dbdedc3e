//! Rule storage: the data every machine executes against.

use crate::kind::Kind;
use std::fmt;

/// Error type hooks may fail with; propagated unchanged to the `fire` caller.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a side-effecting hook.
pub type HookResult = Result<(), HookError>;

pub(crate) type EntryHook<C, S> = Box<dyn Fn(&mut C, &S) -> HookResult + Send + Sync>;
pub(crate) type FilterFn<C, S, E> = Box<dyn Fn(&C, &S, &E) -> bool + Send + Sync>;
pub(crate) type TriggerHook<C, S, E> = Box<dyn Fn(&mut C, &S, &E) -> HookResult + Send + Sync>;
pub(crate) type Resolver<C, S, E> =
    Box<dyn Fn(&mut C, &S, &E) -> Result<S, HookError> + Send + Sync>;

/// Entry/exit behavior declared against one state kind.
pub struct StateRule<C, S> {
    pub(crate) kind: Kind,
    pub(crate) label: Option<String>,
    pub(crate) on_enter: Option<EntryHook<C, S>>,
    pub(crate) on_exit: Option<EntryHook<C, S>>,
}

impl<C, S> StateRule<C, S> {
    pub(crate) fn new(kind: Kind) -> Self {
        Self {
            kind,
            label: None,
            on_enter: None,
            on_exit: None,
        }
    }

    /// Kind this rule was declared against.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Human-readable label, if one was set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn enter(&self, context: &mut C, state: &S) -> HookResult {
        match &self.on_enter {
            Some(hook) => hook(context, state),
            None => Ok(()),
        }
    }

    pub(crate) fn exit(&self, context: &mut C, state: &S) -> HookResult {
        match &self.on_exit {
            Some(hook) => hook(context, state),
            None => Ok(()),
        }
    }
}

impl<C, S> fmt::Debug for StateRule<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRule")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("enter", &self.on_enter.is_some())
            .field("exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Transition half of an event rule: the resolver producing the next state,
/// and whether it re-enters the current state without exit/entry hooks.
pub(crate) struct Transit<C, S, E> {
    pub(crate) resolver: Resolver<C, S, E>,
    pub(crate) is_loop: bool,
}

/// Filter/trigger/transition behavior declared against a
/// (state kind, event kind) pair.
///
/// A rule without a filter is a *fallback*: it matches unconditionally once
/// the kind check passes. A rule is a *transition candidate* iff it carries
/// a resolver (looping or not).
pub struct EventRule<C, S, E> {
    pub(crate) state_kind: Kind,
    pub(crate) event_kind: Kind,
    pub(crate) label: Option<String>,
    pub(crate) filter: Option<FilterFn<C, S, E>>,
    pub(crate) trigger: Option<TriggerHook<C, S, E>>,
    pub(crate) transit: Option<Transit<C, S, E>>,
}

impl<C, S, E> EventRule<C, S, E> {
    pub(crate) fn new(state_kind: Kind, event_kind: Kind) -> Self {
        Self {
            state_kind,
            event_kind,
            label: None,
            filter: None,
            trigger: None,
            transit: None,
        }
    }

    /// State kind this rule was declared against.
    pub fn state_kind(&self) -> Kind {
        self.state_kind
    }

    /// Event kind this rule was declared against.
    pub fn event_kind(&self) -> Kind {
        self.event_kind
    }

    /// Human-readable label, if one was set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether this rule matches unconditionally (no filter).
    pub fn is_fallback(&self) -> bool {
        self.filter.is_none()
    }

    /// Whether this rule can perform a transition.
    pub fn is_transition(&self) -> bool {
        self.transit.is_some()
    }

    /// Whether this rule re-enters the current state without exit/entry.
    pub fn is_loop(&self) -> bool {
        self.transit.as_ref().is_some_and(|t| t.is_loop)
    }

    pub(crate) fn passes(&self, context: &C, state: &S, event: &E) -> bool {
        match &self.filter {
            Some(filter) => filter(context, state, event),
            None => true,
        }
    }

    pub(crate) fn run_trigger(&self, context: &mut C, state: &S, event: &E) -> HookResult {
        match &self.trigger {
            Some(hook) => hook(context, state, event),
            None => Ok(()),
        }
    }
}

impl<C, S, E> fmt::Debug for EventRule<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRule")
            .field("state_kind", &self.state_kind)
            .field("event_kind", &self.event_kind)
            .field("label", &self.label)
            .field("filter", &self.filter.is_some())
            .field("trigger", &self.trigger.is_some())
            .field("transition", &self.transit.is_some())
            .field("loop", &self.is_loop())
            .finish()
    }
}
