//! The execution core: owns state and context, drives dispatch.

use crate::config::rules::Transit;
use crate::config::Config;
use crate::kind::{Kind, Kinded};
use crate::machine::cache::{transition_order, EventMatch, RuleCache};
use crate::machine::error::{HookStage, MachineError};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything one in-flight operation owns exclusively: the application
/// context, the current state value and the rule cache.
struct Session<C, S> {
    context: C,
    state: S,
    cache: RuleCache,
}

/// A running state machine instance over a frozen [`Config`].
///
/// The machine owns exactly one current state value, replaced on every
/// non-loop transition. At most one operation (the implicit initial entry
/// or a [`fire`] call) is in flight at a time; a reentrant or concurrent
/// attempt fails immediately with [`MachineError::Busy`] rather than
/// queuing or blocking.
///
/// Independent machines may share one `Arc<Config>` and run concurrently
/// on separate threads; the frozen configuration needs no synchronization.
///
/// [`fire`]: Machine::fire
pub struct Machine<C, S, E> {
    config: Arc<Config<C, S, E>>,
    slot: Mutex<Option<Session<C, S>>>,
}

impl<C, S, E> Machine<C, S, E>
where
    S: Kinded,
    E: Kinded,
{
    /// Create a machine and perform the initial entry.
    ///
    /// Entry hooks for the initial state's concrete kind run outer-to-inner
    /// before the machine is returned; a failing hook fails construction.
    pub fn new(
        config: impl Into<Arc<Config<C, S, E>>>,
        context: C,
        initial: S,
    ) -> Result<Self, MachineError> {
        let config = config.into();
        let mut session = Session {
            context,
            state: initial,
            cache: RuleCache::new(),
        };
        enter_state(&config, &mut session)?;
        Ok(Self {
            config,
            slot: Mutex::new(Some(session)),
        })
    }

    /// The frozen configuration this machine executes against.
    pub fn config(&self) -> &Config<C, S, E> {
        &self.config
    }

    /// Dispatch one event.
    ///
    /// Runs the trigger hooks of every filter-passing rule in general-to-
    /// specific order, then performs the single best-ranked transition.
    /// Unhandled and ambiguous events are detected before any hook runs,
    /// leaving state and context untouched.
    pub fn fire(&self, event: E) -> Result<(), MachineError> {
        let mut guard = SessionGuard::acquire(&self.slot)?;
        dispatch(&self.config, guard.session_mut(), &event)
    }

    /// Clone of the current state.
    ///
    /// Reports [`MachineError::Busy`] while an operation is in flight.
    pub fn state(&self) -> Result<S, MachineError>
    where
        S: Clone,
    {
        self.inspect(|_, state| state.clone())
    }

    /// Clone of the context value.
    ///
    /// Reports [`MachineError::Busy`] while an operation is in flight.
    pub fn context(&self) -> Result<C, MachineError>
    where
        C: Clone,
    {
        self.inspect(|context, _| context.clone())
    }

    /// Borrow-style read access to context and state.
    ///
    /// The closure must not call back into this machine. Reports
    /// [`MachineError::Busy`] while an operation is in flight.
    pub fn inspect<R>(&self, f: impl FnOnce(&C, &S) -> R) -> Result<R, MachineError> {
        let slot = lock(&self.slot);
        match slot.as_ref() {
            Some(session) => Ok(f(&session.context, &session.state)),
            None => Err(MachineError::Busy),
        }
    }
}

impl<C, S, E> fmt::Debug for Machine<C, S, E>
where
    S: Kinded,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match lock(&self.slot).as_ref() {
            Some(session) => session.state.kind().to_string(),
            None => "<in flight>".to_string(),
        };
        f.debug_struct("Machine")
            .field("state", &state)
            .field("config", &self.config)
            .finish()
    }
}

// The lock is only ever held to move the session in or out, never across
// user code, so poisoning cannot leave a hook's panic wedged in here.
fn lock<T>(slot: &Mutex<Option<T>>) -> MutexGuard<'_, Option<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive token for one operation: checking the session out of the slot
/// marks the machine busy, and dropping the guard restores it on every exit
/// path, panics included.
struct SessionGuard<'a, C, S> {
    slot: &'a Mutex<Option<Session<C, S>>>,
    session: Option<Session<C, S>>,
}

impl<'a, C, S> SessionGuard<'a, C, S> {
    fn acquire(slot: &'a Mutex<Option<Session<C, S>>>) -> Result<Self, MachineError> {
        match lock(slot).take() {
            Some(session) => Ok(Self {
                slot,
                session: Some(session),
            }),
            None => Err(MachineError::Busy),
        }
    }

    fn session_mut(&mut self) -> &mut Session<C, S> {
        match &mut self.session {
            Some(session) => session,
            // The session is only given back in drop.
            None => unreachable!("session guard accessed after release"),
        }
    }
}

impl<C, S> Drop for SessionGuard<'_, C, S> {
    fn drop(&mut self) {
        *lock(self.slot) = self.session.take();
    }
}

fn resolve_kind<C, S, E>(
    config: &Config<C, S, E>,
    value: &dyn Kinded,
) -> Result<Kind, MachineError> {
    let name = value.kind();
    config
        .graph()
        .get(name)
        .ok_or_else(|| MachineError::UnknownKind {
            name: name.to_string(),
        })
}

/// Run entry hooks for the current state's kind, outer-to-inner: a base
/// kind initializes before a derived kind refines, mirroring constructors.
fn enter_state<C, S, E>(
    config: &Config<C, S, E>,
    session: &mut Session<C, S>,
) -> Result<(), MachineError>
where
    S: Kinded,
{
    let kind = resolve_kind(config, &session.state)?;
    let entry = session.cache.state_entry(config, kind);
    for m in entry.iter() {
        config.state_rules()[m.index]
            .enter(&mut session.context, &session.state)
            .map_err(|source| MachineError::Hook {
                stage: HookStage::Enter,
                source,
            })?;
    }
    Ok(())
}

/// Run exit hooks for the current state's kind, inner-to-outer: a derived
/// kind tears down before its base, mirroring destructors.
fn exit_state<C, S, E>(
    config: &Config<C, S, E>,
    session: &mut Session<C, S>,
    kind: Kind,
) -> Result<(), MachineError> {
    let entry = session.cache.state_entry(config, kind);
    for m in entry.iter().rev() {
        config.state_rules()[m.index]
            .exit(&mut session.context, &session.state)
            .map_err(|source| MachineError::Hook {
                stage: HookStage::Exit,
                source,
            })?;
    }
    Ok(())
}

fn dispatch<C, S, E>(
    config: &Config<C, S, E>,
    session: &mut Session<C, S>,
    event: &E,
) -> Result<(), MachineError>
where
    S: Kinded,
    E: Kinded,
{
    let state_kind = resolve_kind(config, &session.state)?;
    let event_kind = resolve_kind(config, event)?;
    let matches = session.cache.event_entry(config, state_kind, event_kind);

    // Filters run once, up front; the passing set keeps its trigger order.
    let passing: Vec<EventMatch> = matches
        .iter()
        .copied()
        .filter(|m| {
            config.event_rules()[m.index].passes(&session.context, &session.state, event)
        })
        .collect();

    // Select the transition before any side effect, so an unhandled or
    // ambiguous event leaves the machine exactly as it was.
    let mut candidates: Vec<(EventMatch, &Transit<C, S, E>)> = passing
        .iter()
        .copied()
        .filter_map(|m| config.event_rules()[m.index].transit.as_ref().map(|t| (m, t)))
        .collect();
    candidates.sort_by(|a, b| transition_order(&a.0, &b.0));

    let Some(&(best, transit)) = candidates.first() else {
        return Err(MachineError::Unhandled {
            state: config.graph().name_of(state_kind).to_string(),
            event: config.graph().name_of(event_kind).to_string(),
        });
    };
    let tied = candidates
        .iter()
        .take_while(|(m, _)| transition_order(m, &best).is_eq())
        .count();
    if tied > 1 {
        return Err(MachineError::Ambiguous {
            state: config.graph().name_of(state_kind).to_string(),
            event: config.graph().name_of(event_kind).to_string(),
            count: tied,
        });
    }

    // Every matching trigger fires, broadly-scoped observers first.
    for m in &passing {
        config.event_rules()[m.index]
            .run_trigger(&mut session.context, &session.state, event)
            .map_err(|source| MachineError::Hook {
                stage: HookStage::Trigger,
                source,
            })?;
    }

    if transit.is_loop {
        session.state = (transit.resolver)(&mut session.context, &session.state, event)
            .map_err(|source| MachineError::Hook {
                stage: HookStage::Transition,
                source,
            })?;
        tracing::debug!(
            state = config.graph().name_of(state_kind),
            event = config.graph().name_of(event_kind),
            "loop transition"
        );
    } else {
        exit_state(config, session, state_kind)?;
        session.state = (transit.resolver)(&mut session.context, &session.state, event)
            .map_err(|source| MachineError::Hook {
                stage: HookStage::Transition,
                source,
            })?;
        tracing::debug!(
            from = config.graph().name_of(state_kind),
            to = session.state.kind(),
            event = config.graph().name_of(event_kind),
            "state changed"
        );
        enter_state(config, session)?;
    }
    Ok(())
}
