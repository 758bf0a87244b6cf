// crates/engine_core/src/render/command.rs

use glam::{Vec2, Vec4};

/// Whether a command is drawn under the camera translation or straight onto
/// the screen (HUD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawSpace {
    #[default]
    World,
    Screen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    Sprite { name: String, frame: u32, flip_x: bool },
    /// Tile `index` (already id-1) from `tileset`.
    Tile { tileset: String, index: u32, size: Vec2 },
    Rect { size: Vec2, color: Vec4 },
    Text { text: String, color: Vec4 },
}

/// One queued draw call. Positions are world coordinates for `World` space;
/// the camera offset is never baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub kind: DrawKind,
    pub position: Vec2,
    pub z: f32,
    pub space: DrawSpace,
}

impl RenderCommand {
    pub fn sprite(name: impl Into<String>, frame: u32, position: Vec2, z: f32) -> Self {
        Self {
            kind: DrawKind::Sprite {
                name: name.into(),
                frame,
                flip_x: false,
            },
            position,
            z,
            space: DrawSpace::World,
        }
    }

    pub fn tile(tileset: impl Into<String>, index: u32, position: Vec2, size: Vec2, z: f32) -> Self {
        Self {
            kind: DrawKind::Tile {
                tileset: tileset.into(),
                index,
                size,
            },
            position,
            z,
            space: DrawSpace::World,
        }
    }

    pub fn rect(position: Vec2, size: Vec2, color: Vec4, z: f32) -> Self {
        Self {
            kind: DrawKind::Rect { size, color },
            position,
            z,
            space: DrawSpace::World,
        }
    }

    /// Text defaults to screen space.
    pub fn text(text: impl Into<String>, position: Vec2, color: Vec4, z: f32) -> Self {
        Self {
            kind: DrawKind::Text {
                text: text.into(),
                color,
            },
            position,
            z,
            space: DrawSpace::Screen,
        }
    }

    pub fn flipped(mut self, flip: bool) -> Self {
        if let DrawKind::Sprite { flip_x, .. } = &mut self.kind {
            *flip_x = flip;
        }
        self
    }

    pub fn in_space(mut self, space: DrawSpace) -> Self {
        self.space = space;
        self
    }
}
