// crates/engine_core/src/components/lifetime.rs

use std::any::Any;

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;

/// Removes the parent after `duration` seconds of game time.
#[derive(Debug, Clone, Default)]
pub struct LifetimeComponent {
    pub duration: f32,
    elapsed: f32,
}

impl GameComponent for LifetimeComponent {
    fn phase(&self) -> Phase {
        Phase::Think
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, _systems: &mut SystemRegistry) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            parent.mark_for_removal();
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
