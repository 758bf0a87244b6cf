// crates/game_plugin/src/systems/player.rs

use std::any::Any;

use engine_core::{GameComponent, GameObject, Phase, SystemRegistry};
use engine_ecs::Entity;
use engine_physics::TeamFilter;
use engine_shared::{ActionType, Button, Facing, Rect};
use glam::Vec2;
use tracing::debug;

/// Turns input into running, jumping and attacking. Runs in `Think`, so it
/// sees the tile contacts from the previous tick.
#[derive(Debug, Clone, Default)]
pub struct PlayerControllerComponent {
    pub run_speed: f32,
    pub jump_speed: f32,
    pub attack_damage: i32,
    /// How long the attack pose is held; also the cooldown between attacks.
    pub attack_time: f32,
    /// Hitbox placed in front of the player.
    pub attack_reach: Vec2,
    /// Horizontal camera lead in the facing direction.
    pub look_ahead: f32,
    attack_timer: f32,
}

impl PlayerControllerComponent {
    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    fn hitbox(&self, parent: &GameObject) -> Rect {
        let x = match parent.facing {
            Facing::Right => parent.position.x + parent.width,
            Facing::Left => parent.position.x - self.attack_reach.x,
        };
        let y = parent.position.y + (parent.height - self.attack_reach.y) * 0.5;
        Rect::new(x, y, self.attack_reach.x, self.attack_reach.y)
    }

    fn attack(&mut self, parent: &mut GameObject, systems: &mut SystemRegistry) {
        self.attack_timer = self.attack_time;
        parent.action = ActionType::Attack;

        let hitbox = self.hitbox(parent);
        let targets: Vec<Entity> = match systems.collision.as_ref() {
            Some(collision) => collision
                .overlapping(&hitbox, parent.entity(), TeamFilter::HostileTo(parent.team))
                .map(|c| c.owner)
                .collect(),
            None => Vec::new(),
        };
        debug!(targets = targets.len(), "player attack");
        for target in targets {
            systems.hit(parent.entity(), target, self.attack_damage);
        }
    }
}

impl GameComponent for PlayerControllerComponent {
    fn phase(&self) -> Phase {
        Phase::Think
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        // Life owns the object while it is reacting or dying.
        if matches!(parent.action, ActionType::HitReact | ActionType::Death) {
            self.attack_timer = 0.0;
            return;
        }

        let input = systems.input;
        let grounded = parent.contact.grounded;

        if self.attack_timer > 0.0 {
            self.attack_timer -= dt;
            if grounded {
                parent.velocity.x = 0.0;
            }
            if self.attack_timer > 0.0 {
                return;
            }
        }

        let direction = input.horizontal();
        parent.velocity.x = direction * self.run_speed;
        if direction > 0.0 {
            parent.facing = Facing::Right;
        } else if direction < 0.0 {
            parent.facing = Facing::Left;
        }
        parent.action = if direction != 0.0 { ActionType::Move } else { ActionType::Idle };

        if input.pressed(Button::Jump) && grounded {
            parent.velocity.y = -self.jump_speed;
        }
        if input.pressed(Button::Attack) {
            self.attack(parent, systems);
        }

        if let Some(camera) = systems.camera.as_mut() {
            camera.set_look_ahead(Vec2::new(parent.facing.sign() * self.look_ahead, 0.0));
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
