// crates/engine_core/src/components/life.rs

use std::any::Any;

use engine_shared::ActionType;
use glam::Vec2;

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;

/// Reacts to the action the object manager sets when a hit lands.
///
/// `HitReact`: knockback away from the attacker, a short stun and a window of
/// invulnerability. `Death`: stop, wait `death_delay`, optionally spawn an
/// effect, then remove the parent.
#[derive(Debug, Clone, Default)]
pub struct LifeComponent {
    pub hit_react_time: f32,
    pub invulnerable_time: f32,
    pub death_delay: f32,
    /// x away from the attacker, y upward.
    pub knockback: Vec2,
    pub death_effect: Option<String>,
    pub hit_sound: Option<String>,
    pub death_sound: Option<String>,

    reacting: bool,
    react_timer: f32,
    invulnerable_timer: f32,
    dying: bool,
    death_timer: f32,
}

impl LifeComponent {
    pub fn is_dying(&self) -> bool {
        self.dying
    }

    fn begin_hit_react(&mut self, parent: &mut GameObject, systems: &mut SystemRegistry) {
        self.reacting = true;
        self.react_timer = self.hit_react_time;
        self.invulnerable_timer = self.invulnerable_time.max(self.hit_react_time);
        parent.invulnerable = true;

        let away = match parent.last_hit_from {
            Some(from) if from.x != parent.center().x => (parent.center().x - from.x).signum(),
            _ => -parent.facing.sign(),
        };
        parent.velocity = Vec2::new(self.knockback.x * away, -self.knockback.y);

        if let Some(sound) = &self.hit_sound {
            systems.play_sound(sound);
        }
    }

    fn begin_death(&mut self, parent: &mut GameObject, systems: &mut SystemRegistry) {
        self.dying = true;
        self.reacting = false;
        self.death_timer = self.death_delay;
        parent.velocity.x = 0.0;
        parent.collidable = false;
        if let Some(sound) = &self.death_sound {
            systems.play_sound(sound);
        }
    }
}

impl GameComponent for LifeComponent {
    fn phase(&self) -> Phase {
        Phase::PostCollision
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if parent.action == ActionType::Death {
            if !self.dying {
                self.begin_death(parent, systems);
            }
            self.death_timer -= dt;
            if self.death_timer <= 0.0 && !parent.is_marked_for_removal() {
                if let Some(effect) = &self.death_effect {
                    systems.spawn(effect, parent.center());
                }
                parent.mark_for_removal();
            }
            return;
        }

        if parent.action == ActionType::HitReact && !self.reacting {
            self.begin_hit_react(parent, systems);
        }

        if self.reacting {
            self.react_timer -= dt;
            if self.react_timer <= 0.0 {
                self.reacting = false;
                if parent.action == ActionType::HitReact {
                    parent.action = ActionType::Idle;
                }
            }
        }

        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer -= dt;
            if self.invulnerable_timer <= 0.0 {
                parent.invulnerable = false;
            }
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
