// crates/engine_core/src/simulation.rs
//! One running game: the systems, the objects, the level and the factory
//! that turns manifest types into objects.

use std::path::Path;

use engine_shared::{InputState, LevelManifest, SpawnRecord};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::level::{self, LevelSystem, ObjectFactory};
use crate::object::GameObjectManager;
use crate::registry::SystemRegistry;
use crate::render::{RenderStats, RenderSurface};

/// The manager is kept next to the registry rather than inside it, so it can
/// hand the registry to every component it ticks.
pub struct Simulation {
    pub systems: SystemRegistry,
    pub objects: GameObjectManager,
    pub level: LevelSystem,
    factory: Box<dyn ObjectFactory>,
    frame: u64,
}

impl Simulation {
    pub fn new(config: EngineConfig, factory: Box<dyn ObjectFactory>) -> Self {
        let objects = GameObjectManager::new(config.max_objects);
        Self {
            systems: SystemRegistry::new(config),
            objects,
            level: LevelSystem::default(),
            factory,
            frame: 0,
        }
    }

    /// Replace whatever is running with `manifest`. Returns the number of
    /// objects spawned.
    pub fn load_level(&mut self, manifest: LevelManifest) -> Result<usize, EngineError> {
        self.reset();
        self.level
            .apply(manifest, &mut self.objects, &mut self.systems, self.factory.as_mut())
    }

    pub fn load_level_file(&mut self, path: impl AsRef<Path>) -> Result<usize, EngineError> {
        let manifest = level::load_file(path)?;
        self.load_level(manifest)
    }

    /// Run one tick and return the game delta it used.
    ///
    /// Input and the clock advance first. Draw queues are emptied so that
    /// only the latest tick is ever rendered. Temporary surfaces registered
    /// last tick become visible, then the camera, the objects and the queued
    /// spawns update in that order. The camera runs on real time so shake
    /// keeps going during hit-stop.
    pub fn step(&mut self, real_dt: f32, input: InputState) -> f32 {
        self.frame += 1;
        self.systems.input.advance(input);
        let dt = self.systems.time.update(real_dt);

        if let Some(render) = self.systems.render.as_mut() {
            render.clear();
        }
        if let Some(collision) = self.systems.collision.as_mut() {
            collision.update_temporary_surfaces();
        }

        let objects = &self.objects;
        if let Some(camera) = self.systems.camera.as_mut() {
            camera.update(real_dt, |entity| objects.camera_target(entity));
        }

        self.objects.update(dt, &mut self.systems);

        for request in self.systems.spawns.drain() {
            let record = SpawnRecord::new(&request.kind, request.position.x, request.position.y, 0.0, 0.0);
            if let Some(entity) =
                level::spawn_record(&record, &mut self.objects, &mut self.systems, self.factory.as_mut())
            {
                debug!(?entity, kind = %request.kind, "runtime spawn");
            }
        }

        let focus = self.systems.camera_focus();
        let viewport = self.systems.config.viewport;
        if let Some(render) = self.systems.render.as_mut() {
            self.level.tile_map().queue_visible(focus, viewport, render);
        }
        dt
    }

    /// Flush the draw queues of the last tick onto `surface`.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) -> RenderStats {
        let focus = self.systems.camera_focus();
        match self.systems.render.as_mut() {
            Some(render) => render.render(surface, focus),
            None => RenderStats::default(),
        }
    }

    /// Destroy every object and return all systems to their empty state.
    pub fn reset(&mut self) {
        self.objects.reset();
        self.systems.reset();
        self.level.clear();
        self.frame = 0;
        info!("simulation reset");
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
