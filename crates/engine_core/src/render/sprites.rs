// crates/engine_core/src/render/sprites.rs

use std::collections::HashMap;

use engine_shared::math::fnv1a;
use glam::{Vec2, Vec4};
use tracing::debug;

/// Size of a generated placeholder frame.
pub const PLACEHOLDER_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Metadata for a sprite sheet. Pixel data lives with the surface; the core
/// only needs to know the sheet exists and how it is cut.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub name: String,
    pub frame_size: Vec2,
    pub frame_count: u32,
    /// Flat fill used when this is a placeholder.
    pub color: Vec4,
    pub placeholder: bool,
}

impl SpriteImage {
    pub fn new(name: impl Into<String>, frame_size: Vec2, frame_count: u32) -> Self {
        Self {
            name: name.into(),
            frame_size,
            frame_count: frame_count.max(1),
            color: Vec4::ONE,
            placeholder: false,
        }
    }

    /// Solid-color stand-in whose color is derived from the name, so the same
    /// missing sprite always looks the same.
    pub fn placeholder(name: &str) -> Self {
        let hash = fnv1a(name);
        let channel = |shift: u32| ((hash >> shift) & 0xff) as f32 / 255.0;
        Self {
            name: name.to_string(),
            frame_size: PLACEHOLDER_SIZE,
            frame_count: 1,
            color: Vec4::new(channel(0), channel(8), channel(16), 1.0),
            placeholder: true,
        }
    }
}

/// Loaded sprites plus lazily generated placeholders.
#[derive(Debug, Default)]
pub struct SpriteCache {
    loaded: HashMap<String, SpriteImage>,
    placeholders: HashMap<String, SpriteImage>,
}

impl SpriteCache {
    pub fn register(&mut self, image: SpriteImage) {
        self.placeholders.remove(&image.name);
        self.loaded.insert(image.name.clone(), image);
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// The loaded sprite, or the placeholder for `name` (generated on first
    /// request, then reused).
    pub fn resolve(&mut self, name: &str) -> &SpriteImage {
        if self.loaded.contains_key(name) {
            return &self.loaded[name];
        }
        self.placeholders.entry(name.to_string()).or_insert_with(|| {
            debug!(sprite = name, "sprite missing, using placeholder");
            SpriteImage::placeholder(name)
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_generated_once_and_stable() {
        let mut cache = SpriteCache::default();
        let first = cache.resolve("slime").clone();
        let second = cache.resolve("slime").clone();
        assert!(first.placeholder);
        assert_eq!(first, second);
        assert_eq!(cache.placeholder_count(), 1);
        assert_eq!(SpriteImage::placeholder("slime").color, first.color);
        assert_ne!(SpriteImage::placeholder("bat").color, first.color);
    }

    #[test]
    fn registered_sprite_replaces_placeholder() {
        let mut cache = SpriteCache::default();
        cache.resolve("hero");
        cache.register(SpriteImage::new("hero", Vec2::new(16.0, 24.0), 4));
        let hero = cache.resolve("hero");
        assert!(!hero.placeholder);
        assert_eq!(hero.frame_count, 4);
        assert_eq!(cache.placeholder_count(), 0);
    }
}
