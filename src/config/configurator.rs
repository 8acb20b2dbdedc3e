//! Mutable authoring surface for rule declaration.

use crate::config::error::ConfigError;
use crate::config::frozen::Config;
use crate::config::rules::{EventRule, HookResult, StateRule, Transit};
use crate::config::HookError;
use crate::kind::{Kind, KindGraph};
use std::collections::HashMap;
use std::sync::Arc;

/// Mutable collection of rules under construction.
///
/// The configurator is append-only: state rules are created at most once per
/// declared kind (repeated [`state`] calls return the existing rule), event
/// rules are appended on every [`event`] call, and declaration order of
/// event rules is preserved all the way into the frozen [`Config`].
///
/// [`state`]: Configurator::state
/// [`event`]: Configurator::event
///
/// # Example
///
/// ```rust
/// use kindred::{Configurator, KindGraph};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = KindGraph::new();
/// let task = graph.class("Task")?;
/// let tick = graph.class("Tick")?;
///
/// #[derive(Clone, Debug)]
/// struct Count(u32);
///
/// let mut cfg = Configurator::<(), Count, ()>::new(graph);
/// cfg.state(task).label("task")?;
/// cfg.event(task, tick)
///     .goes(|_, state, _| Ok(Count(state.0 + 1)))?;
/// let config = cfg.freeze();
/// assert_eq!(config.event_rules().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Configurator<C, S, E> {
    graph: Arc<KindGraph>,
    state_rules: Vec<StateRule<C, S>>,
    state_index: HashMap<Kind, usize>,
    event_rules: Vec<EventRule<C, S, E>>,
}

impl<C, S, E> Configurator<C, S, E> {
    /// Start authoring against a finished kind graph.
    pub fn new(graph: KindGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            state_rules: Vec::new(),
            state_index: HashMap::new(),
            event_rules: Vec::new(),
        }
    }

    /// The kind graph rules are declared against.
    pub fn graph(&self) -> &KindGraph {
        &self.graph
    }

    /// State rule for `kind`, created on first use.
    ///
    /// Requesting an already-configured kind hands back the existing rule,
    /// so entry and exit can be declared in separate passes.
    pub fn state(&mut self, kind: Kind) -> StateRuleMut<'_, C, S> {
        let index = *self.state_index.entry(kind).or_insert_with(|| {
            self.state_rules.push(StateRule::new(kind));
            self.state_rules.len() - 1
        });
        StateRuleMut {
            id: format!("state rule '{}'", self.graph.name_of(kind)),
            rule: &mut self.state_rules[index],
        }
    }

    /// Append a fresh event rule for the (state kind, event kind) pair.
    ///
    /// Each call creates a new, independent rule even for a repeated pair;
    /// rules are never merged.
    pub fn event(&mut self, state_kind: Kind, event_kind: Kind) -> EventRuleMut<'_, C, S, E> {
        let id = format!(
            "event rule '{}'/'{}'",
            self.graph.name_of(state_kind),
            self.graph.name_of(event_kind)
        );
        let index = self.event_rules.len();
        self.event_rules.push(EventRule::new(state_kind, event_kind));
        EventRuleMut {
            id,
            rule: &mut self.event_rules[index],
        }
    }

    /// Consume the configurator and produce the immutable snapshot.
    pub fn freeze(self) -> Config<C, S, E> {
        Config {
            graph: self.graph,
            state_rules: self.state_rules,
            event_rules: self.event_rules,
        }
    }
}

/// Set-once access to a state rule during authoring.
pub struct StateRuleMut<'a, C, S> {
    id: String,
    rule: &'a mut StateRule<C, S>,
}

impl<'a, C, S> std::fmt::Debug for StateRuleMut<'a, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRuleMut").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<'a, C, S> StateRuleMut<'a, C, S> {
    /// Set the human-readable label.
    pub fn label(self, name: &str) -> Result<Self, ConfigError> {
        if self.rule.label.is_some() {
            return Err(ConfigError::redefined(self.id, "label"));
        }
        self.rule.label = Some(name.to_string());
        Ok(self)
    }

    /// Set the entry hook, run when the machine enters a state of this kind.
    pub fn on_enter<F>(self, hook: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S) -> HookResult + Send + Sync + 'static,
    {
        if self.rule.on_enter.is_some() {
            return Err(ConfigError::redefined(self.id, "entry hook"));
        }
        self.rule.on_enter = Some(Box::new(hook));
        Ok(self)
    }

    /// Set the exit hook, run when the machine leaves a state of this kind.
    pub fn on_exit<F>(self, hook: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S) -> HookResult + Send + Sync + 'static,
    {
        if self.rule.on_exit.is_some() {
            return Err(ConfigError::redefined(self.id, "exit hook"));
        }
        self.rule.on_exit = Some(Box::new(hook));
        Ok(self)
    }
}

/// Set-once access to one freshly appended event rule during authoring.
pub struct EventRuleMut<'a, C, S, E> {
    id: String,
    rule: &'a mut EventRule<C, S, E>,
}

impl<'a, C, S, E> std::fmt::Debug for EventRuleMut<'a, C, S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRuleMut").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<'a, C, S, E> EventRuleMut<'a, C, S, E> {
    /// Set the human-readable label.
    pub fn label(self, name: &str) -> Result<Self, ConfigError> {
        if self.rule.label.is_some() {
            return Err(ConfigError::redefined(self.id, "label"));
        }
        self.rule.label = Some(name.to_string());
        Ok(self)
    }

    /// Set the filter predicate. A rule without one is a fallback and
    /// matches unconditionally.
    pub fn filter<F>(self, predicate: F) -> Result<Self, ConfigError>
    where
        F: Fn(&C, &S, &E) -> bool + Send + Sync + 'static,
    {
        if self.rule.filter.is_some() {
            return Err(ConfigError::redefined(self.id, "filter"));
        }
        self.rule.filter = Some(Box::new(predicate));
        Ok(self)
    }

    /// Set the trigger hook, run for every matching rule on each fire.
    pub fn trigger<F>(self, hook: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S, &E) -> HookResult + Send + Sync + 'static,
    {
        if self.rule.trigger.is_some() {
            return Err(ConfigError::redefined(self.id, "trigger hook"));
        }
        self.rule.trigger = Some(Box::new(hook));
        Ok(self)
    }

    /// Set a transition resolver: the returned state replaces the current
    /// one, with exit and entry hooks running around the replacement.
    pub fn goes<F>(self, resolver: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S, &E) -> Result<S, HookError> + Send + Sync + 'static,
    {
        self.transit(Box::new(resolver), false)
    }

    /// Set a looping resolver: the returned state replaces the current one
    /// without any exit or entry hooks running.
    pub fn loops<F>(self, resolver: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S, &E) -> Result<S, HookError> + Send + Sync + 'static,
    {
        self.transit(Box::new(resolver), true)
    }

    /// Loop that keeps the current state as-is.
    pub fn stays(self) -> Result<Self, ConfigError>
    where
        S: Clone,
    {
        self.transit(Box::new(|_: &mut C, state: &S, _: &E| Ok(state.clone())), true)
    }

    fn transit(
        self,
        resolver: crate::config::rules::Resolver<C, S, E>,
        is_loop: bool,
    ) -> Result<Self, ConfigError> {
        if self.rule.transit.is_some() {
            return Err(ConfigError::redefined(self.id, "transition"));
        }
        self.rule.transit = Some(Transit { resolver, is_loop });
        Ok(self)
    }
}
