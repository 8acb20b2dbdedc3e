//! Door walkthrough: hierarchical rules, filtered loops and a catch-all
//! fallback, driven from the command line.
//!
//! Run with: `cargo run --example door`

use kindred::{Configurator, KindGraph, Kinded, Machine};
use std::error::Error;

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

/// Context: the sounds the door makes.
#[derive(Clone, Debug, Default)]
struct Speaker;

impl Speaker {
    fn play(&mut self, sound: &str) {
        println!("  {sound}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut graph = KindGraph::new();
    let door = graph.class("Door")?;
    let closed = graph.subclass("Closed", door)?;
    let open = graph.subclass("Open", door)?;
    let event = graph.capability("DoorEvent")?;
    let lock = graph.class("Lock")?;
    let unlock = graph.class("Unlock")?;
    let open_up = graph.class("OpenUp")?;
    let shut = graph.class("Shut")?;
    for kind in [lock, unlock, open_up, shut] {
        graph.implement(kind, event)?;
    }

    let mut cfg: Configurator<Speaker, Door, DoorEvent> = Configurator::new(graph);
    cfg.event(door, unlock)
        .filter(|_, state, _| state.locked())?
        .loops(|speaker: &mut Speaker, state: &Door, _: &DoorEvent| {
            speaker.play("Click!");
            Ok(state.with_locked(false))
        })?;
    cfg.event(door, lock)
        .filter(|_, state, _| !state.locked())?
        .loops(|speaker: &mut Speaker, state: &Door, _: &DoorEvent| {
            speaker.play("Clack!");
            Ok(state.with_locked(true))
        })?;
    cfg.event(closed, open_up)
        .filter(|_, state, _| state.locked())?
        .loops(|speaker: &mut Speaker, state: &Door, _: &DoorEvent| {
            speaker.play("Click! Click!");
            Ok(state.clone())
        })?;
    cfg.event(closed, open_up)
        .goes(|speaker: &mut Speaker, _: &Door, _: &DoorEvent| {
            speaker.play("Click! Squeak!");
            Ok(Door::Open { locked: false })
        })?;
    cfg.event(open, shut)
        .filter(|_, state, _| state.locked())?
        .loops(|speaker: &mut Speaker, state: &Door, _: &DoorEvent| {
            speaker.play("Squeak! Bang!");
            Ok(state.clone())
        })?;
    cfg.event(open, shut)
        .goes(|speaker: &mut Speaker, _: &Door, _: &DoorEvent| {
            speaker.play("Squeak! Click!");
            Ok(Door::Closed { locked: false })
        })?;
    cfg.event(door, event).stays()?;

    let machine = Machine::new(cfg.freeze(), Speaker, Door::Closed { locked: true })?;

    for event in [
        DoorEvent::OpenUp, // locked: rattles
        DoorEvent::Unlock,
        DoorEvent::OpenUp,
        DoorEvent::Shut,
        DoorEvent::Lock,
    ] {
        println!("fire {event:?}");
        machine.fire(event)?;
        println!("  -> {:?}", machine.state()?);
    }

    Ok(())
}
