//! Frozen configuration snapshot.

use crate::config::rules::{EventRule, StateRule};
use crate::kind::KindGraph;
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of all declared rules.
///
/// Produced by [`Configurator::freeze`](super::Configurator::freeze), which
/// consumes the authoring surface: once a `Config` exists there is no path
/// left for mutating the rules it holds. The snapshot is `Send + Sync`; one
/// `Arc<Config>` can back any number of independent machines, concurrently,
/// without further synchronization.
pub struct Config<C, S, E> {
    pub(crate) graph: Arc<KindGraph>,
    pub(crate) state_rules: Vec<StateRule<C, S>>,
    pub(crate) event_rules: Vec<EventRule<C, S, E>>,
}

impl<C, S, E> Config<C, S, E> {
    /// The kind graph the rules are declared against.
    pub fn graph(&self) -> &KindGraph {
        &self.graph
    }

    /// All state rules, in declaration order.
    pub fn state_rules(&self) -> &[StateRule<C, S>] {
        &self.state_rules
    }

    /// All event rules, in declaration order.
    pub fn event_rules(&self) -> &[EventRule<C, S, E>] {
        &self.event_rules
    }
}

impl<C, S, E> fmt::Debug for Config<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("kinds", &self.graph.len())
            .field("state_rules", &self.state_rules.len())
            .field("event_rules", &self.event_rules.len())
            .finish()
    }
}
