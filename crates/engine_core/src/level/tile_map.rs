// crates/engine_core/src/level/tile_map.rs

use engine_shared::{LevelManifest, COLLISION_LAYER};
use glam::Vec2;

use crate::render::{RenderCommand, RenderLayer, RenderSystem};

/// Tileset used when a layer does not name one.
pub const DEFAULT_TILESET: &str = "tiles";

// Base z for each band. Layer order inside a band adds 0, 1, 2, ...
const BACKGROUND_Z: f32 = -1000.0;
const MAIN_Z: f32 = -10.0;
const FOREGROUND_Z: f32 = 1000.0;

/// Z band inferred from a layer's name: `background*` behind everything,
/// `foreground*` in front of sprites, anything else just behind sprites.
pub fn layer_z(name: &str, index: usize) -> f32 {
    let base = if name.starts_with("background") {
        BACKGROUND_Z
    } else if name.starts_with("foreground") {
        FOREGROUND_Z
    } else {
        MAIN_Z
    };
    base + index as f32
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub tileset: String,
    pub parallax: f32,
    pub z: f32,
    tiles: Vec<i32>,
}

impl TileLayer {
    pub fn is_collision(&self) -> bool {
        self.name == COLLISION_LAYER
    }
}

/// The drawable tile layers of a level.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    columns: usize,
    rows: usize,
    tile_size: Vec2,
    layers: Vec<TileLayer>,
}

impl TileMap {
    /// Layer sizes are assumed to have been validated against the grid.
    pub fn from_manifest(manifest: &LevelManifest) -> Self {
        let mut background = 0;
        let mut main = 0;
        let mut foreground = 0;

        let layers = manifest
            .layers
            .iter()
            .map(|data| {
                let counter = if data.name.starts_with("background") {
                    &mut background
                } else if data.name.starts_with("foreground") {
                    &mut foreground
                } else {
                    &mut main
                };
                let z = layer_z(&data.name, *counter);
                *counter += 1;
                TileLayer {
                    name: data.name.clone(),
                    tileset: data.tileset.clone().unwrap_or_else(|| DEFAULT_TILESET.to_string()),
                    parallax: data.parallax,
                    z,
                    tiles: data.data.clone(),
                }
            })
            .collect();

        Self {
            columns: manifest.width,
            rows: manifest.height,
            tile_size: Vec2::new(manifest.tile_width, manifest.tile_height),
            layers,
        }
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Queue the tiles of every layer that fall inside the view, plus one
    /// tile of slack on each side. Returns the number of tiles queued.
    ///
    /// A layer with parallax `p` scrolls at `p` times the camera speed. The
    /// render system subtracts the full camera offset from every world-space
    /// command, so each tile is queued shifted by `camera * (1 - p)`.
    pub fn queue_visible(&self, camera: Vec2, viewport: Vec2, render: &mut RenderSystem) -> usize {
        if self.columns == 0 || self.rows == 0 || self.tile_size.x <= 0.0 || self.tile_size.y <= 0.0 {
            return 0;
        }

        let mut queued = 0;
        for layer in &self.layers {
            let view_origin = camera * layer.parallax;
            let shift = camera * (1.0 - layer.parallax);

            let first_col = ((view_origin.x / self.tile_size.x).floor() as i64 - 1).max(0) as usize;
            let first_row = ((view_origin.y / self.tile_size.y).floor() as i64 - 1).max(0) as usize;
            let last_col = (((view_origin.x + viewport.x) / self.tile_size.x).floor() as i64 + 1)
                .clamp(-1, self.columns as i64 - 1);
            let last_row = (((view_origin.y + viewport.y) / self.tile_size.y).floor() as i64 + 1)
                .clamp(-1, self.rows as i64 - 1);
            if last_col < 0 || last_row < 0 {
                continue;
            }

            for row in first_row..=last_row as usize {
                for col in first_col..=last_col as usize {
                    let id = layer.tiles.get(row * self.columns + col).copied().unwrap_or(0);
                    if id <= 0 {
                        continue;
                    }
                    let world = Vec2::new(col as f32 * self.tile_size.x, row as f32 * self.tile_size.y);
                    let command = RenderCommand::tile(
                        layer.tileset.as_str(),
                        (id - 1) as u32,
                        world + shift,
                        self.tile_size,
                        layer.z,
                    );
                    if render.queue(RenderLayer::Background, command) {
                        queued += 1;
                    }
                }
            }
        }
        queued
    }
}
