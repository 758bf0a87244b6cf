// crates/engine_core/src/registry.rs
//! The simulation context every component receives.
//!
//! One registry belongs to one `Simulation`. Optional systems may be absent;
//! the helper methods turn calls into absent systems into no-ops so gameplay
//! code never has to care.

use engine_ecs::Entity;
use engine_physics::CollisionSystem;
use engine_shared::{Facing, InputFrame};
use glam::Vec2;

use crate::camera::CameraSystem;
use crate::config::EngineConfig;
use crate::events::{EventQueue, HitEvent, SpawnRequest};
use crate::render::{RenderCommand, RenderLayer, RenderSystem};
use crate::time::TimeSystem;

/// Audio boundary. Playback itself lives outside the core.
pub trait SoundSink {
    fn play(&mut self, name: &str);
}

/// Read-only copy of the player, refreshed by the object manager at the start
/// of every tick so other objects can react to it without touching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub entity: Entity,
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub life: i32,
}

impl PlayerSnapshot {
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

pub struct SystemRegistry {
    pub config: EngineConfig,
    pub input: InputFrame,
    pub time: TimeSystem,
    pub camera: Option<CameraSystem>,
    pub collision: Option<CollisionSystem>,
    pub render: Option<RenderSystem>,
    pub sound: Option<Box<dyn SoundSink>>,
    pub hits: EventQueue<HitEvent>,
    pub spawns: EventQueue<SpawnRequest>,
    pub player: Option<PlayerSnapshot>,
    pub score: u64,
}

impl SystemRegistry {
    /// Registry with camera, collision and render systems built from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let mut registry = Self::bare(config);
        registry.camera = Some(CameraSystem::from_config(&registry.config));
        registry.collision = Some(CollisionSystem::new(registry.config.max_colliders));
        registry.render = Some(RenderSystem::new(registry.config.render_queue_capacity));
        registry
    }

    /// Registry with no optional systems at all.
    pub fn bare(config: EngineConfig) -> Self {
        Self {
            config,
            input: InputFrame::default(),
            time: TimeSystem::default(),
            camera: None,
            collision: None,
            render: None,
            sound: None,
            hits: EventQueue::default(),
            spawns: EventQueue::default(),
            player: None,
            score: 0,
        }
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundSink>) -> Self {
        self.sound = Some(sound);
        self
    }

    // --- No-op-when-absent helpers ---

    pub fn shake_camera(&mut self, magnitude: f32, duration: f32) {
        if let Some(camera) = self.camera.as_mut() {
            camera.shake(magnitude, duration);
        }
    }

    pub fn camera_focus(&self) -> Vec2 {
        self.camera.as_ref().map_or(Vec2::ZERO, |c| c.focus_position())
    }

    pub fn play_sound(&mut self, name: &str) {
        if let Some(sound) = self.sound.as_mut() {
            sound.play(name);
        }
    }

    pub fn draw(&mut self, layer: RenderLayer, command: RenderCommand) {
        if let Some(render) = self.render.as_mut() {
            render.queue(layer, command);
        }
    }

    pub fn spawn(&mut self, kind: &str, position: Vec2) {
        self.spawns.push(SpawnRequest::new(kind, position));
    }

    pub fn hit(&mut self, attacker: Entity, target: Entity, damage: i32) {
        self.hits.push(HitEvent {
            attacker,
            target,
            damage,
        });
    }

    /// Hit-stop for everything driven by game time.
    pub fn freeze(&mut self, duration: f32) {
        self.time.freeze(duration);
    }

    /// Back to a known-empty baseline: systems keep existing but lose all
    /// state, queues and the player snapshot are cleared.
    pub fn reset(&mut self) {
        self.input = InputFrame::default();
        self.time.reset();
        if let Some(camera) = self.camera.as_mut() {
            camera.reset();
        }
        if let Some(collision) = self.collision.as_mut() {
            collision.reset();
        }
        if let Some(render) = self.render.as_mut() {
            render.clear();
        }
        self.hits.clear();
        self.spawns.clear();
        self.player = None;
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl SoundSink for Recorder {
        fn play(&mut self, name: &str) {
            self.0.borrow_mut().push(name.to_string());
        }
    }

    #[test]
    fn absent_systems_are_no_ops() {
        let mut systems = SystemRegistry::bare(EngineConfig::default());
        systems.shake_camera(5.0, 1.0);
        systems.play_sound("jump");
        systems.draw(
            RenderLayer::Foreground,
            RenderCommand::sprite("hero", 0, Vec2::ZERO, 0.0),
        );
        assert_eq!(systems.camera_focus(), Vec2::ZERO);
    }

    #[test]
    fn sound_goes_to_the_sink() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut systems =
            SystemRegistry::bare(EngineConfig::default()).with_sound(Box::new(Recorder(played.clone())));
        systems.play_sound("coin");
        assert_eq!(*played.borrow(), vec!["coin"]);
    }

    #[test]
    fn two_registries_are_independent() {
        let mut a = SystemRegistry::new(EngineConfig::default());
        let b = SystemRegistry::new(EngineConfig::default());
        a.spawn("spark", Vec2::ZERO);
        a.shake_camera(5.0, 1.0);
        assert_eq!(a.spawns.len(), 1);
        assert!(b.spawns.is_empty());
        assert!(!b.camera.as_ref().unwrap().is_shaking());
    }

    #[test]
    fn reset_clears_queues_and_state() {
        let mut systems = SystemRegistry::new(EngineConfig::default());
        systems.hit(Entity::new(0, 0), Entity::new(1, 0), 1);
        systems.spawn("coin", Vec2::ONE);
        systems.freeze(1.0);
        systems.score = 10;
        systems.draw(
            RenderLayer::Background,
            RenderCommand::sprite("tile", 0, Vec2::ZERO, 0.0),
        );

        systems.reset();
        assert!(systems.hits.is_empty());
        assert!(systems.spawns.is_empty());
        assert!(!systems.time.is_frozen());
        assert_eq!(systems.score, 0);
        assert_eq!(systems.render.as_ref().unwrap().queued_len(), 0);
    }
}
