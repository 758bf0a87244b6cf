// crates/engine_core/src/render/mod.rs
//! Per-frame draw queues. Gameplay queues commands during the tick; `render`
//! sorts them by z and replays them onto a `RenderSurface` exactly once.

mod command;
mod sprites;
mod surface;

pub use command::{DrawKind, DrawSpace, RenderCommand};
pub use sprites::{SpriteCache, SpriteImage, PLACEHOLDER_SIZE};
pub use surface::{RecordingSurface, RenderSurface, SurfaceError, SurfaceOp};

use engine_ecs::FixedArray;
use glam::Vec2;
use tracing::{debug, warn};

/// Which queue a command goes into. Background holds tiles, foreground holds
/// sprites and HUD. Both are merged before sorting, so this only matters for
/// capacity accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    Background,
    Foreground,
}

/// What one flush did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub failed: usize,
    /// Commands refused since the previous flush because a queue was full.
    pub dropped: usize,
    pub placeholders: usize,
}

pub struct RenderSystem {
    background: FixedArray<RenderCommand>,
    foreground: FixedArray<RenderCommand>,
    sprites: SpriteCache,
    dropped: usize,
}

impl RenderSystem {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            background: FixedArray::with_capacity(queue_capacity),
            foreground: FixedArray::with_capacity(queue_capacity),
            sprites: SpriteCache::default(),
            dropped: 0,
        }
    }

    pub fn register_sprite(&mut self, image: SpriteImage) {
        self.sprites.register(image);
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    /// Queue a command. Returns false if the queue was full and the command
    /// was dropped.
    pub fn queue(&mut self, layer: RenderLayer, command: RenderCommand) -> bool {
        let queue = match layer {
            RenderLayer::Background => &mut self.background,
            RenderLayer::Foreground => &mut self.foreground,
        };
        if queue.push(command).is_err() {
            if self.dropped == 0 {
                warn!(?layer, capacity = queue.capacity(), "render queue full, dropping draws");
            }
            self.dropped += 1;
            return false;
        }
        true
    }

    pub fn queue_background(&mut self, command: RenderCommand) -> bool {
        self.queue(RenderLayer::Background, command)
    }

    pub fn queue_foreground(&mut self, command: RenderCommand) -> bool {
        self.queue(RenderLayer::Foreground, command)
    }

    pub fn queued_len(&self) -> usize {
        self.background.len() + self.foreground.len()
    }

    /// Drop everything queued without drawing it.
    pub fn clear(&mut self) {
        self.background.clear();
        self.foreground.clear();
        self.dropped = 0;
    }

    /// Sort and replay the queued commands, then empty the queues.
    ///
    /// `camera` is the camera's focus position. World-space commands are drawn
    /// inside a single `translate(-camera)` that is reverted before the
    /// screen-space commands. A failing draw is logged and counted; it never
    /// stops the flush or leaves commands behind.
    pub fn render(&mut self, surface: &mut dyn RenderSurface, camera: Vec2) -> RenderStats {
        let mut stats = RenderStats {
            dropped: std::mem::take(&mut self.dropped),
            ..RenderStats::default()
        };

        // 1. Merge background then foreground, stable sort keeps submission
        //    order within equal z.
        let mut commands: Vec<RenderCommand> = self.background.drain().collect();
        commands.extend(self.foreground.drain());
        if commands.is_empty() {
            return stats;
        }
        commands.sort_by(|a, b| a.z.total_cmp(&b.z));

        // 2. World pass under the camera translation.
        surface.translate(-camera);
        for command in commands.iter().filter(|c| c.space == DrawSpace::World) {
            self.draw(surface, command, &mut stats);
        }
        surface.translate(camera);

        // 3. Screen pass.
        for command in commands.iter().filter(|c| c.space == DrawSpace::Screen) {
            self.draw(surface, command, &mut stats);
        }

        debug!(
            drawn = stats.drawn,
            failed = stats.failed,
            placeholders = stats.placeholders,
            "frame flushed"
        );
        stats
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, command: &RenderCommand, stats: &mut RenderStats) {
        let result = match &command.kind {
            DrawKind::Sprite { name, frame, flip_x } => {
                let image = self.sprites.resolve(name);
                if image.placeholder {
                    stats.placeholders += 1;
                }
                let frame = frame % image.frame_count.max(1);
                surface.draw_image(image, frame, command.position, *flip_x)
            }
            DrawKind::Tile { tileset, index, size } => surface.draw_tile(tileset, *index, command.position, *size),
            DrawKind::Rect { size, color } => surface.fill_rect(command.position, *size, *color),
            DrawKind::Text { text, color } => surface.draw_text(text, command.position, *color),
        };

        match result {
            Ok(()) => stats.drawn += 1,
            Err(err) => {
                warn!(%err, z = command.z, "draw call failed");
                stats.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_shared::colors;

    fn sprite_names(surface: &RecordingSurface) -> Vec<String> {
        surface
            .draws()
            .filter_map(|op| match op {
                SurfaceOp::Image { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sorts_by_z_and_keeps_submission_order_on_ties() {
        let mut render = RenderSystem::new(16);
        render.queue_foreground(RenderCommand::sprite("c", 0, Vec2::ZERO, 5.0));
        render.queue_foreground(RenderCommand::sprite("a", 0, Vec2::ZERO, 1.0));
        render.queue_foreground(RenderCommand::sprite("b", 0, Vec2::ZERO, 1.0));
        render.queue_background(RenderCommand::sprite("bg", 0, Vec2::ZERO, 1.0));

        let mut surface = RecordingSurface::new();
        render.render(&mut surface, Vec2::ZERO);
        // Background entries come first among equal z.
        assert_eq!(sprite_names(&surface), vec!["bg", "a", "b", "c"]);
    }

    #[test]
    fn second_flush_without_new_commands_draws_nothing() {
        let mut render = RenderSystem::new(16);
        render.queue_foreground(RenderCommand::sprite("hero", 0, Vec2::ZERO, 0.0));

        let mut surface = RecordingSurface::new();
        let first = render.render(&mut surface, Vec2::ZERO);
        assert_eq!(first.drawn, 1);
        assert_eq!(render.queued_len(), 0);

        surface.clear();
        let second = render.render(&mut surface, Vec2::ZERO);
        assert_eq!(second, RenderStats::default());
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn camera_translation_is_applied_once_and_reverted() {
        let mut render = RenderSystem::new(16);
        render.queue_foreground(RenderCommand::sprite("hero", 0, Vec2::new(100.0, 50.0), 0.0));
        render.queue_foreground(RenderCommand::text("HP 3", Vec2::new(4.0, 4.0), colors::WHITE, 100.0));

        let mut surface = RecordingSurface::new();
        render.render(&mut surface, Vec2::new(40.0, 10.0));

        assert_eq!(surface.ops[0], SurfaceOp::Translate(Vec2::new(-40.0, -10.0)));
        assert!(matches!(
            &surface.ops[1],
            SurfaceOp::Image { position, .. } if *position == Vec2::new(100.0, 50.0)
        ));
        assert_eq!(surface.ops[2], SurfaceOp::Translate(Vec2::new(40.0, 10.0)));
        assert!(matches!(&surface.ops[3], SurfaceOp::Text { .. }));
        assert_eq!(surface.translation(), Vec2::ZERO);
    }

    #[test]
    fn missing_sprites_fall_back_to_placeholders() {
        let mut render = RenderSystem::new(16);
        render.register_sprite(SpriteImage::new("hero", Vec2::splat(16.0), 2));
        render.queue_foreground(RenderCommand::sprite("hero", 3, Vec2::ZERO, 0.0));
        render.queue_foreground(RenderCommand::sprite("ghost", 0, Vec2::ZERO, 0.0));

        let mut surface = RecordingSurface::new();
        let stats = render.render(&mut surface, Vec2::ZERO);
        assert_eq!(stats.drawn, 2);
        assert_eq!(stats.placeholders, 1);
        let placeholders: Vec<_> = surface
            .draws()
            .filter_map(|op| match op {
                SurfaceOp::Image { frame, placeholder, .. } => Some((*frame, *placeholder)),
                _ => None,
            })
            .collect();
        assert_eq!(placeholders, vec![(1, false), (0, true)]);
    }

    #[test]
    fn failed_draws_are_counted_and_queues_still_empty() {
        let mut render = RenderSystem::new(16);
        render.queue_foreground(RenderCommand::sprite("broken", 0, Vec2::ZERO, 0.0));
        render.queue_foreground(RenderCommand::sprite("fine", 0, Vec2::ZERO, 1.0));

        let mut surface = RecordingSurface::new();
        surface.fail_on("broken");
        let stats = render.render(&mut surface, Vec2::ZERO);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.drawn, 1);
        assert_eq!(render.queued_len(), 0);
        assert_eq!(surface.translation(), Vec2::ZERO);
    }

    #[test]
    fn overflow_is_dropped_and_counted() {
        let mut render = RenderSystem::new(1);
        assert!(render.queue_foreground(RenderCommand::rect(Vec2::ZERO, Vec2::ONE, colors::RED, 0.0)));
        assert!(!render.queue_foreground(RenderCommand::rect(Vec2::ZERO, Vec2::ONE, colors::RED, 0.0)));
        assert!(render.queue_background(RenderCommand::rect(Vec2::ZERO, Vec2::ONE, colors::RED, 0.0)));

        let mut surface = RecordingSurface::new();
        let stats = render.render(&mut surface, Vec2::ZERO);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.drawn, 2);
    }
}
