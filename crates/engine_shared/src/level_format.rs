// crates/engine_shared/src/level_format.rs
//! On-disk level manifest. Produced by the level editor, consumed by the
//! engine's LevelSystem; the engine never writes it.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Name of the tile layer that feeds the collision grid.
pub const COLLISION_LAYER: &str = "collision";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelManifest {
    #[serde(default)]
    pub name: String,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Grid size in tiles.
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub layers: Vec<TileLayerData>,
    #[serde(default)]
    pub collision_segments: Vec<SegmentData>,
    #[serde(default)]
    pub objects: Vec<SpawnRecord>,
}

impl LevelManifest {
    /// Level extent in world pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_width,
            self.height as f32 * self.tile_height,
        )
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayerData> {
        self.layers.iter().find(|l| l.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerData {
    pub name: String,
    /// Row-major, `width * height` entries. 0 = empty, n > 0 = tile `n - 1`.
    pub data: Vec<i32>,
    #[serde(default = "default_parallax")]
    pub parallax: f32,
    #[serde(default)]
    pub tileset: Option<String>,
}

fn default_parallax() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    pub start: Vec2,
    pub end: Vec2,
    /// Precomputed by the editor; derived from the winding when absent.
    #[serde(default)]
    pub normal: Option<Vec2>,
}

/// One object to spawn when the level starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Free-form numeric tuning (patrol speed, platform travel, ...).
    #[serde(default)]
    pub properties: HashMap<String, f32>,
}

impl SpawnRecord {
    pub fn new(kind: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            kind: kind.to_string(),
            x,
            y,
            width,
            height,
            properties: HashMap::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn property(&self, key: &str, default: f32) -> f32 {
        self.properties.get(key).copied().unwrap_or(default)
    }
}
