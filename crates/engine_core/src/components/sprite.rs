// crates/engine_core/src/components/sprite.rs

use std::any::Any;

use engine_shared::{ActionType, Facing};

use crate::object::{GameComponent, GameObject, Phase};
use crate::registry::SystemRegistry;
use crate::render::{RenderCommand, RenderLayer};

/// Frame range played while the parent is in `action`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub action: ActionType,
    pub first_frame: u32,
    pub frame_count: u32,
    pub frame_time: f32,
    pub looping: bool,
}

impl Animation {
    pub fn new(action: ActionType, first_frame: u32, frame_count: u32, frame_time: f32) -> Self {
        Self {
            action,
            first_frame,
            frame_count: frame_count.max(1),
            frame_time,
            looping: true,
        }
    }

    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    fn frame_at(&self, elapsed: f32) -> u32 {
        if self.frame_time <= 0.0 {
            return self.first_frame;
        }
        let step = (elapsed / self.frame_time) as u32;
        let offset = if self.looping {
            step % self.frame_count
        } else {
            step.min(self.frame_count - 1)
        };
        self.first_frame + offset
    }
}

/// Picks a frame from the parent's current action and queues the draw.
/// Blinks while the parent is invulnerable.
#[derive(Debug, Clone, Default)]
pub struct SpriteComponent {
    pub sprite: String,
    pub animations: Vec<Animation>,
    pub z: f32,
    pub blink_when_invulnerable: bool,
    current: Option<ActionType>,
    elapsed: f32,
    ticks: u32,
}

impl SpriteComponent {
    pub fn current_frame(&self) -> u32 {
        let Some(action) = self.current else {
            return 0;
        };
        self.animations
            .iter()
            .find(|a| a.action == action)
            .or_else(|| self.animations.first())
            .map_or(0, |a| a.frame_at(self.elapsed))
    }
}

impl GameComponent for SpriteComponent {
    fn phase(&self) -> Phase {
        Phase::Draw
    }

    fn update(&mut self, dt: f32, parent: &mut GameObject, systems: &mut SystemRegistry) {
        if self.current != Some(parent.action) {
            self.current = Some(parent.action);
            self.elapsed = 0.0;
        } else {
            self.elapsed += dt;
        }
        self.ticks = self.ticks.wrapping_add(1);

        if self.blink_when_invulnerable && parent.invulnerable && self.ticks % 4 < 2 {
            return;
        }

        let command = RenderCommand::sprite(self.sprite.as_str(), self.current_frame(), parent.position, self.z)
            .flipped(parent.facing == Facing::Left);
        systems.draw(RenderLayer::Foreground, command);
    }

    fn reset(&mut self) {
        self.sprite.clear();
        self.animations.clear();
        self.z = 0.0;
        self.blink_when_invulnerable = false;
        self.current = None;
        self.elapsed = 0.0;
        self.ticks = 0;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
