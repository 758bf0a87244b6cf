// crates/game_plugin/src/systems/camera.rs

use std::any::Any;

use engine_core::{GameComponent, GameObject, Phase, SystemRegistry};
use tracing::info;

/// Pulls the camera onto the parent the first time the player walks within
/// `reach` of it, holds it there for `duration` seconds, then hands the
/// camera back to the player. Fires once.
#[derive(Debug, Clone, Default)]
pub struct CameraFocusTrigger {
    pub reach: f32,
    pub duration: f32,
    fired: bool,
    remaining: f32,
}

impl CameraFocusTrigger {
    pub fn is_focusing(&self) -> bool {
        self.remaining > 0.0
    }
}

impl GameComponent for CameraFocusTrigger {
    fn phase(&self) -> Phase {
        Phase::Think
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                if let Some(camera) = systems.camera.as_mut() {
                    camera.release_npc_focus();
                }
            }
            return;
        }
        if self.fired {
            return;
        }

        let Some(player) = systems.player else {
            return;
        };
        if !parent.rect().inflate(self.reach).contains_point(player.center()) {
            return;
        }
        let Some(camera) = systems.camera.as_mut() else {
            return;
        };

        self.fired = true;
        self.remaining = self.duration;
        camera.set_npc_target(parent.entity());
        info!(npc = ?parent.entity(), duration = self.duration, "camera focus");
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
    use engine_core::{EngineConfig, GameObjectManager, PlayerSnapshot};
    use engine_shared::Facing;
    use glam::Vec2;

    #[test]
    fn focuses_once_for_the_duration() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        let mut objects = GameObjectManager::new(4);
        let npc = objects.create_object();
        let player = objects.create_object();
        systems.camera.as_mut().unwrap().set_target(Some(player));

        let snapshot = PlayerSnapshot {
            entity: player,
            position: Vec2::new(40.0, 0.0),
            size: Vec2::splat(16.0),
            velocity: Vec2::ZERO,
            facing: Facing::Left,
            life: 3,
        };
        systems.player = Some(snapshot);

        let mut trigger = CameraFocusTrigger {
            reach: 32.0,
            duration: 1.0,
            ..CameraFocusTrigger::default()
        };
        let object = objects.get_mut(npc).unwrap();
        object.set_size(Vec2::splat(32.0));

        trigger.update(0.5, object, &mut systems);
        assert!(trigger.is_focusing());
        assert!(systems.camera.as_ref().unwrap().has_npc_focus());

        trigger.update(0.6, object, &mut systems);
        assert!(!trigger.is_focusing());
        let camera = systems.camera.as_ref().unwrap();
        assert!(!camera.has_npc_focus());
        assert_eq!(camera.target(), Some(player));

        // Still in reach, but spent.
        trigger.update(0.5, object, &mut systems);
        assert!(!systems.camera.as_ref().unwrap().has_npc_focus());
    }
}
