// crates/engine_core/src/components/moving_platform.rs

use std::any::Any;

use engine_physics::Segment;
use glam::Vec2;

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;

/// Ping-pongs the parent between `start` and `end` and publishes its top
/// edge as a temporary surface every tick. Riders see the surface from the
/// following frame.
#[derive(Debug, Clone, Default)]
pub struct MovingPlatformComponent {
    pub start: Vec2,
    pub end: Vec2,
    /// Pixels per second.
    pub speed: f32,
    // 0 at start, 1 at end.
    progress: f32,
    returning: bool,
}

impl GameComponent for MovingPlatformComponent {
    fn phase(&self) -> Phase {
        Phase::Physics
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        let span = self.start.distance(self.end);
        let before = parent.position;

        if span > 0.0 && dt > 0.0 {
            let step = self.speed * dt / span;
            if self.returning {
                self.progress -= step;
                if self.progress <= 0.0 {
                    self.progress = -self.progress;
                    self.returning = false;
                }
            } else {
                self.progress += step;
                if self.progress >= 1.0 {
                    self.progress = 2.0 - self.progress;
                    self.returning = true;
                }
            }
            self.progress = self.progress.clamp(0.0, 1.0);
            parent.position = self.start.lerp(self.end, self.progress);
            parent.velocity = (parent.position - before) / dt;
        } else {
            parent.velocity = Vec2::ZERO;
        }

        if let Some(collision) = systems.collision.as_mut() {
            let left = parent.position;
            let right = left + Vec2::new(parent.width, 0.0);
            collision.register_temporary_surface(Segment::with_derived_normal(left, right).moving(parent.velocity));
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
