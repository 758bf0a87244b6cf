// crates/engine_core/src/components/background_collision.rs

use std::any::Any;

use glam::Vec2;

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;

/// Keeps the parent out of solid tiles and lets it stand on one-way surfaces.
/// Leaves the contact result on `parent.contact` for later phases.
#[derive(Debug, Clone, Default)]
pub struct BackgroundCollisionComponent {
    /// Ignore floor segments and temporary surfaces.
    pub tiles_only: bool,
}

impl GameComponent for BackgroundCollisionComponent {
    fn phase(&self) -> Phase {
        Phase::Collision
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        let Some(collision) = systems.collision.as_ref() else {
            return;
        };

        let size = parent.size();
        let (position, velocity) = (parent.position, parent.velocity);
        let mut contact = collision.check_tile_collision(position.x, position.y, size.x, size.y, velocity.x, velocity.y);
        collision.resolve_collision(&contact, &mut parent.position, &mut parent.velocity, size);

        if !contact.grounded && !self.tiles_only {
            if let Some(surface) = collision.check_surface_collision(&parent.rect(), parent.velocity) {
                parent.position.y = surface.surface_y - size.y;
                parent.velocity.y = 0.0;
                parent.position += surface.carry * dt;
                contact.grounded = true;
                contact.ground_y = surface.surface_y;
                contact.normal = (contact.normal + Vec2::NEG_Y).normalize_or_zero();
            }
        }

        parent.contact = contact;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use approx::assert_relative_eq;
    use engine_physics::{Segment, TileGrid};

    fn systems_with_floor() -> SystemRegistry {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0, 0,
            1, 1, 1, 1,
        ];
        systems
            .collision
            .as_mut()
            .unwrap()
            .set_tile_grid(TileGrid::new(4, 2, 32.0, 32.0, cells).unwrap());
        systems
    }

    #[test]
    fn snaps_onto_the_floor_and_records_contact() {
        let mut systems = systems_with_floor();
        let mut object = GameObject::default();
        object.set_size(Vec2::splat(32.0));
        object.position = Vec2::new(0.0, 5.0);
        object.velocity = Vec2::new(0.0, 50.0);

        BackgroundCollisionComponent::default().update(0.1, &mut object, &mut systems);
        assert!(object.contact.grounded);
        assert_relative_eq!(object.position.y, 0.0);
        assert_eq!(object.velocity.y, 0.0);
    }

    #[test]
    fn rides_a_moving_surface() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        let collision = systems.collision.as_mut().unwrap();
        collision.register_temporary_surface(
            Segment::with_derived_normal(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0))
                .moving(Vec2::new(50.0, 0.0)),
        );
        collision.update_temporary_surfaces();

        let mut object = GameObject::default();
        object.set_size(Vec2::new(16.0, 32.0));
        object.position = Vec2::new(20.0, 70.0);
        object.velocity = Vec2::new(0.0, 30.0);

        BackgroundCollisionComponent::default().update(0.1, &mut object, &mut systems);
        assert!(object.contact.grounded);
        assert_relative_eq!(object.position.y, 68.0);
        assert_relative_eq!(object.position.x, 25.0);
    }
}
