// crates/game_plugin/src/systems/pickup.rs

use std::any::Any;

use engine_core::{GameComponent, GameObject, Phase, SystemRegistry};
use engine_shared::Rect;
use tracing::debug;

/// Collected when the player touches it: adds to the score, plays a sound,
/// leaves an effect behind and removes the parent.
#[derive(Debug, Clone, Default)]
pub struct PickupComponent {
    pub value: u64,
    pub sound: Option<String>,
    pub effect: Option<String>,
    collected: bool,
}

impl GameComponent for PickupComponent {
    fn phase(&self) -> Phase {
        Phase::PostCollision
    }

    fn update(&mut self, _dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if self.collected {
            return;
        }
        let Some(player) = systems.player else {
            return;
        };
        if player.life <= 0 || !parent.rect().overlaps(&Rect::from_pos_size(player.position, player.size)) {
            return;
        }

        self.collected = true;
        systems.score += self.value;
        if let Some(sound) = &self.sound {
            systems.play_sound(sound);
        }
        if let Some(effect) = &self.effect {
            systems.spawn(effect, parent.center());
        }
        parent.mark_for_removal();
        debug!(value = self.value, score = systems.score, "pickup collected");
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
