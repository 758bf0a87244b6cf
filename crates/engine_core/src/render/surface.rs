// crates/engine_core/src/render/surface.rs

use glam::{Vec2, Vec4};
use thiserror::Error;

use crate::render::sprites::SpriteImage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("unknown tileset '{0}'")]
    UnknownTileset(String),
    #[error("draw failed: {0}")]
    DrawFailed(String),
}

/// The screen the render system flushes into. Implemented by whatever owns
/// real pixels; `RecordingSurface` is the headless implementation.
pub trait RenderSurface {
    /// Offset every following draw by `offset` (cumulative).
    fn translate(&mut self, offset: Vec2);

    fn draw_image(&mut self, image: &SpriteImage, frame: u32, position: Vec2, flip_x: bool) -> Result<(), SurfaceError>;

    fn draw_tile(&mut self, tileset: &str, index: u32, position: Vec2, size: Vec2) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, position: Vec2, size: Vec2, color: Vec4) -> Result<(), SurfaceError>;

    fn draw_text(&mut self, text: &str, position: Vec2, color: Vec4) -> Result<(), SurfaceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Translate(Vec2),
    Image {
        name: String,
        frame: u32,
        position: Vec2,
        flip_x: bool,
        placeholder: bool,
    },
    Tile {
        tileset: String,
        index: u32,
        position: Vec2,
    },
    Rect {
        position: Vec2,
        size: Vec2,
    },
    Text {
        text: String,
        position: Vec2,
    },
}

/// Records every call instead of drawing. Used by tests and the headless
/// runner. Draws of an image named in `failing` return an error.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    translation: Vec2,
    failing: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.failing.push(name.into());
    }

    /// Net translation currently applied.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Draw operations only, without translations.
    pub fn draws(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.ops.iter().filter(|op| !matches!(op, SurfaceOp::Translate(_)))
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn translate(&mut self, offset: Vec2) {
        self.translation += offset;
        self.ops.push(SurfaceOp::Translate(offset));
    }

    fn draw_image(&mut self, image: &SpriteImage, frame: u32, position: Vec2, flip_x: bool) -> Result<(), SurfaceError> {
        if self.failing.iter().any(|n| *n == image.name) {
            return Err(SurfaceError::DrawFailed(image.name.clone()));
        }
        self.ops.push(SurfaceOp::Image {
            name: image.name.clone(),
            frame,
            position,
            flip_x,
            placeholder: image.placeholder,
        });
        Ok(())
    }

    fn draw_tile(&mut self, tileset: &str, index: u32, position: Vec2, _size: Vec2) -> Result<(), SurfaceError> {
        if self.failing.iter().any(|n| n == tileset) {
            return Err(SurfaceError::UnknownTileset(tileset.to_string()));
        }
        self.ops.push(SurfaceOp::Tile {
            tileset: tileset.to_string(),
            index,
            position,
        });
        Ok(())
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2, _color: Vec4) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::Rect { position, size });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Vec2, _color: Vec4) -> Result<(), SurfaceError> {
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            position,
        });
        Ok(())
    }
}
