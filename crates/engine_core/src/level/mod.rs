// crates/engine_core/src/level/mod.rs
//! Level loading: manifest validation, collision setup, object spawning and
//! the tile layers drawn behind and in front of the actors.

mod tile_map;

pub use tile_map::{layer_z, TileLayer, TileMap, DEFAULT_TILESET};

use std::path::Path;

use engine_ecs::Entity;
use engine_physics::{Segment, TileGrid};
use engine_shared::{LevelManifest, Rect, SpawnRecord, COLLISION_LAYER};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::object::GameObjectManager;
use crate::registry::SystemRegistry;

/// Manifest type that becomes the manager's player and the camera target.
pub const PLAYER_KIND: &str = "player";

/// Builds game objects from spawn records. Lives outside the core so the
/// game decides what a "coin" or an "enemy" is.
pub trait ObjectFactory {
    /// Create and configure an object for `record`, without adding it.
    /// Returns `None`, having allocated nothing, for unknown types.
    fn spawn(
        &mut self,
        record: &SpawnRecord,
        objects: &mut GameObjectManager,
        systems: &mut SystemRegistry,
    ) -> Option<Entity>;
}

pub fn parse_manifest(text: &str) -> Result<LevelManifest, EngineError> {
    let manifest: LevelManifest = serde_json::from_str(text)?;
    validate(&manifest)?;
    Ok(manifest)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<LevelManifest, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text)
}

fn validate(manifest: &LevelManifest) -> Result<(), EngineError> {
    let valid_side = |side: f32| side > 0.0 && side.is_finite();
    if !(valid_side(manifest.tile_width) && valid_side(manifest.tile_height)) {
        return Err(EngineError::InvalidLevel(format!(
            "tile size must be positive and finite, got {}x{}",
            manifest.tile_width, manifest.tile_height
        )));
    }

    let Some(cells) = manifest.width.checked_mul(manifest.height) else {
        return Err(EngineError::InvalidLevel(format!(
            "level size {}x{} is too large",
            manifest.width, manifest.height
        )));
    };
    for layer in &manifest.layers {
        if layer.data.len() != cells {
            return Err(EngineError::InvalidLevel(format!(
                "layer '{}' has {} cells, expected {} ({}x{})",
                layer.name,
                layer.data.len(),
                cells,
                manifest.width,
                manifest.height
            )));
        }
    }

    for (i, segment) in manifest.collision_segments.iter().enumerate() {
        if segment.start == segment.end {
            return Err(EngineError::InvalidLevel(format!("collision segment {i} has zero length")));
        }
    }
    Ok(())
}

/// Holds the current level's static data.
#[derive(Default)]
pub struct LevelSystem {
    manifest: Option<LevelManifest>,
    tile_map: TileMap,
}

impl LevelSystem {
    pub fn manifest(&self) -> Option<&LevelManifest> {
        self.manifest.as_ref()
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.tile_map
    }

    /// Install `manifest` into the systems and spawn its objects.
    ///
    /// 1. Collision grid from the `collision` layer, plus segments.
    /// 2. Camera bounds to the level extent.
    /// 3. One object per spawn record through `factory`; the player becomes
    ///    the manager's player and the camera target, and the camera snaps to
    ///    it.
    ///
    /// Objects are added to the manager, so they go live at its next commit.
    /// Returns how many objects were spawned.
    pub fn apply(
        &mut self,
        manifest: LevelManifest,
        objects: &mut GameObjectManager,
        systems: &mut SystemRegistry,
        factory: &mut dyn ObjectFactory,
    ) -> Result<usize, EngineError> {
        validate(&manifest)?;

        // 1. Collision
        if let Some(collision) = systems.collision.as_mut() {
            if let Some(layer) = manifest.layer(COLLISION_LAYER) {
                let grid = TileGrid::new(
                    manifest.width,
                    manifest.height,
                    manifest.tile_width,
                    manifest.tile_height,
                    layer.data.clone(),
                )?;
                collision.set_tile_grid(grid);
            }
            let segments = manifest
                .collision_segments
                .iter()
                .map(|s| match s.normal {
                    Some(normal) => Segment::new(s.start, s.end, normal),
                    None => Segment::with_derived_normal(s.start, s.end),
                })
                .collect();
            collision.set_segments(segments);
        }

        // 2. Camera bounds
        let extent = manifest.pixel_size();
        if let Some(camera) = systems.camera.as_mut() {
            camera.set_bounds(Some(Rect::new(0.0, 0.0, extent.x, extent.y)));
        }

        // 3. Objects
        let mut spawned = 0;
        for record in &manifest.objects {
            if spawn_record(record, objects, systems, factory).is_some() {
                spawned += 1;
            }
        }

        info!(
            level = %manifest.name,
            columns = manifest.width,
            rows = manifest.height,
            spawned,
            "level loaded"
        );
        self.tile_map = TileMap::from_manifest(&manifest);
        self.manifest = Some(manifest);
        Ok(spawned)
    }

    pub fn clear(&mut self) {
        self.manifest = None;
        self.tile_map = TileMap::default();
    }
}

/// Spawn one record through `factory`, set its activation radius from the
/// config and queue it for adding. Shared by level load and runtime spawn
/// requests.
pub fn spawn_record(
    record: &SpawnRecord,
    objects: &mut GameObjectManager,
    systems: &mut SystemRegistry,
    factory: &mut dyn ObjectFactory,
) -> Option<Entity> {
    let Some(entity) = factory.spawn(record, objects, systems) else {
        warn!(kind = %record.kind, x = record.x, y = record.y, "unknown object type, skipped");
        return None;
    };

    let is_player = record.kind == PLAYER_KIND;
    let radius = systems.config.activation_radius(&record.kind);
    let center = match objects.get_mut(entity) {
        Some(object) => {
            object.kind = record.kind.clone();
            // The player never goes to sleep.
            object.activation_radius = if is_player { 0.0 } else { radius };
            object.center()
        }
        None => {
            warn!(kind = %record.kind, "factory returned a dead handle");
            return None;
        }
    };

    if is_player {
        objects.set_player(Some(entity));
        if let Some(camera) = systems.camera.as_mut() {
            camera.set_target(Some(entity));
            camera.center_on(center);
        }
    }
    objects.add(entity);
    Some(entity)
}
