//! Per-machine memoization of applicable rules.
//!
//! Rule applicability depends only on concrete kinds, so the filtered and
//! ranked rule lists are computed once per distinct kind (or kind pair) a
//! machine encounters and reused for its lifetime. Entries are handed out
//! as `Arc` slices so callers keep no borrow into the cache itself.

use crate::config::Config;
use crate::kind::Kind;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// One applicable state rule, annotated with its specificity distance.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StateMatch {
    pub(crate) index: usize,
    pub(crate) distance: u32,
}

/// One applicable event rule, annotated for ranking. `index` is the
/// declaration index, which doubles as the trigger-order tie-break.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EventMatch {
    pub(crate) index: usize,
    pub(crate) state_distance: u32,
    pub(crate) event_distance: u32,
    pub(crate) fallback: bool,
}

/// Ordering used to pick the transition: most specific first (ascending
/// combined distance, state before event), with an explicit filtered rule
/// ranking ahead of an unconditional fallback at equal specificity.
pub(crate) fn transition_order(a: &EventMatch, b: &EventMatch) -> Ordering {
    (a.state_distance, a.event_distance)
        .cmp(&(b.state_distance, b.event_distance))
        .then(a.fallback.cmp(&b.fallback))
}

/// Ordering used to run triggers: most general first (descending combined
/// distance), ties resolved by declaration order.
fn trigger_order(a: &EventMatch, b: &EventMatch) -> Ordering {
    (b.state_distance, b.event_distance)
        .cmp(&(a.state_distance, a.event_distance))
        .then(a.index.cmp(&b.index))
}

/// Memo tables keyed by concrete state kind and (state kind, event kind).
pub(crate) struct RuleCache {
    states: HashMap<Kind, Arc<[StateMatch]>>,
    events: HashMap<(Kind, Kind), Arc<[EventMatch]>>,
}

impl RuleCache {
    pub(crate) fn new() -> Self {
        Self {
            states: HashMap::new(),
            events: HashMap::new(),
        }
    }

    /// Applicable state rules for a concrete kind, outer-to-inner: most
    /// general first, so entry hooks can iterate forward and exit hooks
    /// in reverse.
    pub(crate) fn state_entry<C, S, E>(
        &mut self,
        config: &Config<C, S, E>,
        kind: Kind,
    ) -> Arc<[StateMatch]> {
        self.states
            .entry(kind)
            .or_insert_with(|| compute_state_entry(config, kind))
            .clone()
    }

    /// Applicable event rules for a concrete (state kind, event kind) pair,
    /// stored in trigger order.
    pub(crate) fn event_entry<C, S, E>(
        &mut self,
        config: &Config<C, S, E>,
        state_kind: Kind,
        event_kind: Kind,
    ) -> Arc<[EventMatch]> {
        self.events
            .entry((state_kind, event_kind))
            .or_insert_with(|| compute_event_entry(config, state_kind, event_kind))
            .clone()
    }
}

fn compute_state_entry<C, S, E>(config: &Config<C, S, E>, kind: Kind) -> Arc<[StateMatch]> {
    let graph = config.graph();
    let mut matches: Vec<StateMatch> = config
        .state_rules()
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| {
            graph
                .distance(kind, rule.kind())
                .map(|distance| StateMatch { index, distance })
        })
        .collect();
    matches.sort_by_key(|m| m.distance);
    matches.reverse();
    tracing::trace!(
        kind = graph.name_of(kind),
        rules = matches.len(),
        "cached state rules"
    );
    matches.into()
}

fn compute_event_entry<C, S, E>(
    config: &Config<C, S, E>,
    state_kind: Kind,
    event_kind: Kind,
) -> Arc<[EventMatch]> {
    let graph = config.graph();
    let mut matches: Vec<EventMatch> = config
        .event_rules()
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| {
            let state_distance = graph.distance(state_kind, rule.state_kind())?;
            let event_distance = graph.distance(event_kind, rule.event_kind())?;
            Some(EventMatch {
                index,
                state_distance,
                event_distance,
                fallback: rule.is_fallback(),
            })
        })
        .collect();
    matches.sort_by(trigger_order);
    tracing::trace!(
        state = graph.name_of(state_kind),
        event = graph.name_of(event_kind),
        rules = matches.len(),
        "cached event rules"
    );
    matches.into()
}
