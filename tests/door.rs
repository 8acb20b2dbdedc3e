//! End-to-end door scenario: hierarchical states, capability-kinded
//! events, filtered loops, fallbacks and shared frozen configuration.

use kindred::{Config, Configurator, Kind, KindGraph, Kinded, Machine};
use std::sync::Arc;
use std::thread;

#[derive(Clone, Debug, PartialEq)]
enum Door {
    Closed { locked: bool },
    Open { locked: bool },
}

impl Door {
    fn locked(&self) -> bool {
        match self {
            Door::Closed { locked } | Door::Open { locked } => *locked,
        }
    }

    fn with_locked(&self, locked: bool) -> Door {
        match self {
            Door::Closed { .. } => Door::Closed { locked },
            Door::Open { .. } => Door::Open { locked },
        }
    }
}

impl Kinded for Door {
    fn kind(&self) -> &str {
        match self {
            Door::Closed { .. } => "Closed",
            Door::Open { .. } => "Open",
        }
    }
}

#[derive(Clone, Debug)]
enum DoorEvent {
    Lock,
    Unlock,
    OpenUp,
    Shut,
}

impl Kinded for DoorEvent {
    fn kind(&self) -> &str {
        match self {
            DoorEvent::Lock => "Lock",
            DoorEvent::Unlock => "Unlock",
            DoorEvent::OpenUp => "OpenUp",
            DoorEvent::Shut => "Shut",
        }
    }
}

/// Sounds the door makes, collected by the hooks.
#[derive(Clone, Debug, Default, PartialEq)]
struct Sounds(Vec<String>);

impl Sounds {
    fn emit(&mut self, sound: &str) {
        self.0.push(sound.to_string());
    }
}

struct DoorKinds {
    door: Kind,
    closed: Kind,
    open: Kind,
    event: Kind,
    lock: Kind,
    unlock: Kind,
    open_up: Kind,
    shut: Kind,
}

fn door_kinds() -> (KindGraph, DoorKinds) {
    let mut graph = KindGraph::new();
    let door = graph.class("Door").unwrap();
    let closed = graph.subclass("Closed", door).unwrap();
    let open = graph.subclass("Open", door).unwrap();
    let event = graph.capability("DoorEvent").unwrap();
    let lock = graph.class("Lock").unwrap();
    let unlock = graph.class("Unlock").unwrap();
    let open_up = graph.class("OpenUp").unwrap();
    let shut = graph.class("Shut").unwrap();
    for kind in [lock, unlock, open_up, shut] {
        graph.implement(kind, event).unwrap();
    }
    (
        graph,
        DoorKinds {
            door,
            closed,
            open,
            event,
            lock,
            unlock,
            open_up,
            shut,
        },
    )
}

fn door_config() -> Config<Sounds, Door, DoorEvent> {
    let (graph, k) = door_kinds();
    let mut cfg: Configurator<Sounds, Door, DoorEvent> = Configurator::new(graph);

    // Locking and unlocking work in any door state.
    cfg.event(k.door, k.unlock)
        .filter(|_, state, _| state.locked())
        .unwrap()
        .loops(|sounds: &mut Sounds, state: &Door, _: &DoorEvent| {
            sounds.emit("Click!");
            Ok(state.with_locked(false))
        })
        .unwrap();
    cfg.event(k.door, k.lock)
        .filter(|_, state, _| !state.locked())
        .unwrap()
        .loops(|sounds: &mut Sounds, state: &Door, _: &DoorEvent| {
            sounds.emit("Clack!");
            Ok(state.with_locked(true))
        })
        .unwrap();

    // A locked closed door rattles; an unlocked one swings open.
    cfg.event(k.closed, k.open_up)
        .filter(|_, state, _| state.locked())
        .unwrap()
        .loops(|sounds: &mut Sounds, state: &Door, _: &DoorEvent| {
            sounds.emit("Click! Click!");
            Ok(state.clone())
        })
        .unwrap();
    cfg.event(k.closed, k.open_up)
        .goes(|sounds: &mut Sounds, _: &Door, _: &DoorEvent| {
            sounds.emit("Click! Squeak!");
            Ok(Door::Open { locked: false })
        })
        .unwrap();

    cfg.event(k.open, k.shut)
        .filter(|_, state, _| state.locked())
        .unwrap()
        .loops(|sounds: &mut Sounds, state: &Door, _: &DoorEvent| {
            sounds.emit("Squeak! Bang!");
            Ok(state.clone())
        })
        .unwrap();
    cfg.event(k.open, k.shut)
        .goes(|sounds: &mut Sounds, _: &Door, _: &DoorEvent| {
            sounds.emit("Squeak! Click!");
            Ok(Door::Closed { locked: false })
        })
        .unwrap();

    // Everything else is silently absorbed.
    cfg.event(k.door, k.event).stays().unwrap();

    cfg.freeze()
}

fn locked_door() -> Machine<Sounds, Door, DoorEvent> {
    Machine::new(door_config(), Sounds::default(), Door::Closed { locked: true }).unwrap()
}

#[test]
fn opening_a_locked_door_is_blocked() {
    let door = locked_door();
    door.fire(DoorEvent::OpenUp).unwrap();

    assert_eq!(door.state().unwrap(), Door::Closed { locked: true });
    assert_eq!(door.context().unwrap().0, vec!["Click! Click!"]);
}

#[test]
fn unlock_then_open_transitions() {
    let door = locked_door();
    door.fire(DoorEvent::Unlock).unwrap();
    door.fire(DoorEvent::OpenUp).unwrap();

    assert_eq!(door.state().unwrap(), Door::Open { locked: false });
    assert_eq!(door.context().unwrap().0, vec!["Click!", "Click! Squeak!"]);
}

#[test]
fn full_walkthrough() {
    let door = locked_door();
    door.fire(DoorEvent::Unlock).unwrap();
    door.fire(DoorEvent::OpenUp).unwrap();
    door.fire(DoorEvent::Shut).unwrap();
    door.fire(DoorEvent::Lock).unwrap();

    assert_eq!(door.state().unwrap(), Door::Closed { locked: true });
    assert_eq!(
        door.context().unwrap().0,
        vec!["Click!", "Click! Squeak!", "Squeak! Click!", "Clack!"]
    );
}

#[test]
fn unmatched_events_hit_the_catch_all() {
    let door = locked_door();
    // Shutting a closed door only matches the base-kind fallback loop.
    door.fire(DoorEvent::Shut).unwrap();

    assert_eq!(door.state().unwrap(), Door::Closed { locked: true });
    assert!(door.context().unwrap().0.is_empty());
}

#[test]
fn double_unlock_is_absorbed() {
    let door = locked_door();
    door.fire(DoorEvent::Unlock).unwrap();
    // Already unlocked: the filter fails and the catch-all absorbs it.
    door.fire(DoorEvent::Unlock).unwrap();

    assert_eq!(door.state().unwrap(), Door::Closed { locked: false });
    assert_eq!(door.context().unwrap().0, vec!["Click!"]);
}

#[test]
fn shared_config_drives_independent_machines() {
    let config = Arc::new(door_config());

    let first = Machine::new(
        Arc::clone(&config),
        Sounds::default(),
        Door::Closed { locked: true },
    )
    .unwrap();
    let second = Machine::new(
        Arc::clone(&config),
        Sounds::default(),
        Door::Open { locked: false },
    )
    .unwrap();

    first.fire(DoorEvent::Unlock).unwrap();
    second.fire(DoorEvent::Shut).unwrap();

    assert_eq!(first.state().unwrap(), Door::Closed { locked: false });
    assert_eq!(second.state().unwrap(), Door::Closed { locked: false });
    assert_eq!(first.context().unwrap().0, vec!["Click!"]);
    assert_eq!(second.context().unwrap().0, vec!["Squeak! Click!"]);
}

#[test]
fn machines_run_concurrently_on_separate_threads() {
    let config = Arc::new(door_config());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let door = Machine::new(config, Sounds::default(), Door::Closed { locked: true })
                    .unwrap();
                door.fire(DoorEvent::Unlock).unwrap();
                door.fire(DoorEvent::OpenUp).unwrap();
                door.state().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Door::Open { locked: false });
    }
}
