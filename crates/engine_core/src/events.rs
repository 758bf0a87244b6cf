// crates/engine_core/src/events.rs
//! Cross-object channels. Components never touch another object directly;
//! they post here and the owner of the queue applies the event later in the
//! tick.

use engine_ecs::Entity;
use glam::Vec2;

/// `attacker` landed a hit on `target`. Applied by the object manager after
/// all phases have run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: i32,
}

/// Ask the simulation's factory for a new object of `kind` at `position`
/// (top-left).
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub kind: String,
    pub position: Vec2,
}

impl SpawnRequest {
    pub fn new(kind: impl Into<String>, position: Vec2) -> Self {
        Self {
            kind: kind.into(),
            position,
        }
    }
}

/// FIFO of events posted during a tick.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventQueue<T> {
    pub fn push(&mut self, event: T) {
        self.events.push(event);
    }

    /// Take everything posted so far, in posting order.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
