// crates/engine_core/src/components/movement.rs

use std::any::Any;

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;

/// Gravity plus velocity integration.
#[derive(Debug, Clone, Default)]
pub struct MovementComponent {
    pub gravity: f32,
    pub max_fall_speed: f32,
}

impl GameComponent for MovementComponent {
    fn phase(&self) -> Phase {
        Phase::Physics
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, _systems: &mut SystemRegistry) {
        parent.velocity.y += self.gravity * dt;
        if self.max_fall_speed > 0.0 {
            parent.velocity.y = parent.velocity.y.min(self.max_fall_speed);
        }
        parent.position += parent.velocity * dt;
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
