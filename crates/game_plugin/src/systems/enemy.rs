// crates/game_plugin/src/systems/enemy.rs
//! Walking enemies: a patrol that turns around at walls and ledges, and
//! damage dealt to the player on touch.

use std::any::Any;

use engine_core::{GameComponent, GameObject, Phase, SystemRegistry};
use engine_shared::{ActionType, Facing, Rect, Team};
use glam::Vec2;
use tracing::debug;

/// Walks back and forth in the facing direction. Turns when a tile wall is
/// touched, when a segment wall is within `probe` pixels ahead, or when the
/// ground runs out in front of it.
#[derive(Debug, Clone, Default)]
pub struct PatrolComponent {
    pub speed: f32,
    /// Look-ahead distance for walls and ledges.
    pub probe: f32,
}

impl PatrolComponent {
    fn wall_ahead(&self, parent: &GameObject, systems: &SystemRegistry) -> bool {
        let touching = match parent.facing {
            Facing::Right => parent.contact.right_wall,
            Facing::Left => parent.contact.left_wall,
        };
        if touching {
            return true;
        }

        let Some(collision) = systems.collision.as_ref() else {
            return false;
        };
        let direction = Vec2::new(parent.facing.sign(), 0.0);
        let reach = parent.width * 0.5 + self.probe;
        collision
            .raycast(parent.center(), direction, reach)
            // Only surfaces facing back at us count as walls.
            .is_some_and(|hit| hit.normal.dot(direction) < 0.0)
    }

    fn ledge_ahead(&self, parent: &GameObject, systems: &SystemRegistry) -> bool {
        if !parent.contact.grounded {
            return false;
        }
        let Some(collision) = systems.collision.as_ref() else {
            return false;
        };

        let front = match parent.facing {
            Facing::Right => parent.position.x + parent.width + self.probe,
            Facing::Left => parent.position.x - self.probe,
        };
        let feet = parent.position.y + parent.height;
        let below = Vec2::new(front, feet + 1.0);

        if collision.tile_grid().is_some_and(|grid| grid.is_solid_at(below)) {
            return false;
        }
        // Floor segments and platforms also count as ground.
        let drop = collision.tile_grid().map_or(16.0, |grid| grid.tile_size().y);
        let ground_below = collision
            .raycast(Vec2::new(front, feet - 1.0), Vec2::Y, drop)
            .is_some();
        !ground_below
    }
}

impl GameComponent for PatrolComponent {
    fn phase(&self) -> Phase {
        Phase::Think
    }

    fn update(&mut self, _dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if parent.action != ActionType::Idle && parent.action != ActionType::Move {
            return;
        }

        if self.wall_ahead(parent, systems) || self.ledge_ahead(parent, systems) {
            parent.facing = parent.facing.flipped();
            debug!(entity = ?parent.entity(), facing = ?parent.facing, "patrol turned");
        }
        parent.velocity.x = parent.facing.sign() * self.speed;
        parent.action = ActionType::Move;
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

/// Hurts the player on overlap, at most once per `cooldown`. Each hit shakes
/// the camera and briefly freezes game time.
#[derive(Debug, Clone, Default)]
pub struct ContactDamageComponent {
    pub damage: i32,
    pub cooldown: f32,
    pub shake_magnitude: f32,
    pub shake_duration: f32,
    pub hit_stop: f32,
    cooldown_timer: f32,
}

impl GameComponent for ContactDamageComponent {
    fn phase(&self) -> Phase {
        Phase::PostCollision
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer -= dt;
            return;
        }
        if !parent.is_alive() || parent.action == ActionType::Death {
            return;
        }
        let Some(player) = systems.player else {
            return;
        };
        if !parent.team.is_hostile_to(Team::Player) || player.life <= 0 {
            return;
        }

        let player_rect = Rect::from_pos_size(player.position, player.size);
        if !parent.rect().overlaps(&player_rect) {
            return;
        }

        systems.hit(parent.entity(), player.entity, self.damage);
        systems.shake_camera(self.shake_magnitude, self.shake_duration);
        if self.hit_stop > 0.0 {
            systems.freeze(self.hit_stop);
        }
        self.cooldown_timer = self.cooldown;
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
    use approx::assert_relative_eq;
    use engine_core::registry::PlayerSnapshot;
    use engine_core::{EngineConfig, GameObjectManager};
    use engine_ecs::Entity;
    use engine_physics::{Segment, TileGrid};

    fn walker(objects: &mut GameObjectManager, position: Vec2) -> Entity {
        let entity = objects.create_object();
        let enemy = objects.get_mut(entity).unwrap();
        enemy.position = position;
        enemy.set_size(Vec2::splat(16.0));
        enemy.team = Team::Enemy;
        enemy.contact.grounded = true;
        entity
    }

    fn patrol() -> PatrolComponent {
        PatrolComponent { speed: 30.0, probe: 2.0 }
    }

    #[test]
    fn turns_at_tile_walls() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        let mut objects = GameObjectManager::new(4);
        let entity = walker(&mut objects, Vec2::ZERO);
        let enemy = objects.get_mut(entity).unwrap();
        enemy.contact.right_wall = true;

        patrol().update(0.016, enemy, &mut systems);
        assert_eq!(enemy.facing, Facing::Left);
        assert_relative_eq!(enemy.velocity.x, -30.0);
    }

    #[test]
    fn turns_at_segment_walls() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        systems.collision.as_mut().unwrap().set_segments(vec![
            // Wall 1px right of the walker, facing left.
            Segment::new(Vec2::new(17.0, -50.0), Vec2::new(17.0, 50.0), Vec2::NEG_X),
        ]);
        let mut objects = GameObjectManager::new(4);
        let entity = walker(&mut objects, Vec2::ZERO);
        let enemy = objects.get_mut(entity).unwrap();
        enemy.contact.grounded = false;

        patrol().update(0.016, enemy, &mut systems);
        assert_eq!(enemy.facing, Facing::Left);

        // Walking away from it: nothing ahead.
        patrol().update(0.016, enemy, &mut systems);
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn turns_at_tile_ledges() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        // 4x2 grid, floor under columns 0 and 1 only.
        let grid = TileGrid::new(4, 2, 16.0, 16.0, vec![0, 0, 0, 0, 1, 1, 0, 0]).unwrap();
        systems.collision.as_mut().unwrap().set_tile_grid(grid);
        let mut objects = GameObjectManager::new(4);

        // Standing on column 0, floor continues ahead.
        let safe = walker(&mut objects, Vec2::new(0.0, 0.0));
        let enemy = objects.get_mut(safe).unwrap();
        patrol().update(0.016, enemy, &mut systems);
        assert_eq!(enemy.facing, Facing::Right);

        // Standing on column 1, column 2 is a hole.
        let edge = walker(&mut objects, Vec2::new(16.0, 0.0));
        let enemy = objects.get_mut(edge).unwrap();
        patrol().update(0.016, enemy, &mut systems);
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn contact_damage_respects_cooldown_and_shakes() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        let mut objects = GameObjectManager::new(4);
        let entity = walker(&mut objects, Vec2::ZERO);
        let player = objects.create_object();
        systems.player = Some(PlayerSnapshot {
            entity: player,
            position: Vec2::new(8.0, 0.0),
            size: Vec2::splat(16.0),
            velocity: Vec2::ZERO,
            facing: Facing::Left,
            life: 3,
        });

        let mut damage = ContactDamageComponent {
            damage: 1,
            cooldown: 0.5,
            shake_magnitude: 4.0,
            shake_duration: 0.2,
            hit_stop: 0.05,
            ..ContactDamageComponent::default()
        };
        let enemy = objects.get_mut(entity).unwrap();

        damage.update(0.016, enemy, &mut systems);
        assert_eq!(systems.hits.len(), 1);
        assert!(systems.camera.as_ref().unwrap().is_shaking());
        assert!(systems.time.update(0.016) == 0.0);

        damage.update(0.1, enemy, &mut systems);
        assert_eq!(systems.hits.len(), 1);
    }
}
