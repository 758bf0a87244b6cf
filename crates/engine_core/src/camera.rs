// crates/engine_core/src/camera.rs

use engine_ecs::Entity;
use engine_shared::math::{clamp_range, lerp};
use engine_shared::Rect;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::EngineConfig;

/// What the camera needs to know about whatever it follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy, Default)]
struct Shake {
    magnitude: f32,
    duration: f32,
    remaining: f32,
}

/// Smoothed follow camera with bounds, look-ahead, bias, shake and an NPC
/// focus override.
///
/// `position` is the smoothed top-left of the view. Everything outside this
/// module reads `focus_position()`, which is the clamped sum of the smoothed
/// position and the shake offset.
pub struct CameraSystem {
    viewport: Vec2,
    position: Vec2,
    focus: Vec2,
    bounds: Option<Rect>,

    smoothing: f32,
    look_ahead: Vec2,
    look_ahead_factor: f32,
    bias: Vec2,

    shake: Shake,
    shake_offset: Vec2,
    rng: StdRng,
    seed: u64,

    target: Option<Entity>,
    npc_target: Option<Entity>,
    // Follow target to restore when NPC focus ends.
    saved_target: Option<Entity>,
}

impl CameraSystem {
    pub fn new(viewport: Vec2, smoothing: f32, look_ahead_factor: f32, seed: u64) -> Self {
        Self {
            viewport,
            position: Vec2::ZERO,
            focus: Vec2::ZERO,
            bounds: None,
            smoothing,
            look_ahead: Vec2::ZERO,
            look_ahead_factor,
            bias: Vec2::ZERO,
            shake: Shake::default(),
            shake_offset: Vec2::ZERO,
            rng: StdRng::seed_from_u64(seed),
            seed,
            target: None,
            npc_target: None,
            saved_target: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.viewport,
            config.camera_smoothing,
            config.camera_look_ahead,
            config.shake_seed,
        )
    }

    // --- Targets ---

    /// Follow `target`. Ignored while an NPC holds focus.
    pub fn set_target(&mut self, target: Option<Entity>) {
        if self.npc_target.is_some() {
            debug!(?target, "camera target change ignored during npc focus");
            return;
        }
        self.target = target;
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_npc_target(&mut self, npc: Entity) {
        if self.npc_target.is_none() {
            self.saved_target = self.target;
        }
        self.npc_target = Some(npc);
        self.target = Some(npc);
    }

    pub fn release_npc_focus(&mut self) {
        if self.npc_target.take().is_some() {
            self.target = self.saved_target.take();
        }
    }

    pub fn has_npc_focus(&self) -> bool {
        self.npc_target.is_some()
    }

    // --- Tuning ---

    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.focus = self.clamp(self.position + self.shake_offset);
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn set_bias(&mut self, bias: Vec2) {
        self.bias = bias;
    }

    pub fn set_look_ahead(&mut self, look_ahead: Vec2) {
        self.look_ahead = look_ahead;
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing;
    }

    /// Start a shake. A weaker shake never cuts a stronger one short.
    pub fn shake(&mut self, magnitude: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        if self.shake.remaining > 0.0 && self.shake.magnitude > magnitude {
            return;
        }
        self.shake = Shake {
            magnitude,
            duration,
            remaining: duration,
        };
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.remaining > 0.0
    }

    // --- Per tick ---

    /// Advance one tick. `resolve` maps an entity to its current center and
    /// velocity; an NPC target that no longer resolves releases focus.
    pub fn update(&mut self, dt: f32, resolve: impl Fn(Entity) -> Option<CameraTarget>) {
        if let Some(npc) = self.npc_target {
            if resolve(npc).is_none() {
                debug!(?npc, "npc focus target gone, releasing");
                self.release_npc_focus();
            }
        }

        // 1. Follow
        if let Some(target) = self.target.and_then(&resolve) {
            let desired = target.center
                + self.look_ahead
                + target.velocity * self.look_ahead_factor
                + self.bias
                - self.viewport * 0.5;
            let t = (self.smoothing * dt).min(1.0);
            self.position = Vec2::new(
                lerp(self.position.x, desired.x, t),
                lerp(self.position.y, desired.y, t),
            );
        }
        self.position = self.clamp(self.position);

        // 2. Shake
        self.shake_offset = Vec2::ZERO;
        if self.shake.remaining > 0.0 {
            self.shake.remaining = (self.shake.remaining - dt).max(0.0);
            let fraction = self.shake.remaining / self.shake.duration;
            let strength = self.shake.magnitude * fraction;
            self.shake_offset = Vec2::new(
                self.rng.gen_range(-1.0f32..=1.0) * strength,
                self.rng.gen_range(-1.0f32..=1.0) * strength,
            );
        }

        // 3. Focus
        self.focus = self.clamp(self.position + self.shake_offset);
    }

    /// Snap so the view's top-left is `position`. No smoothing.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = self.clamp(position);
        self.focus = self.clamp(self.position + self.shake_offset);
    }

    /// Snap so `point` is in the middle of the view.
    pub fn center_on(&mut self, point: Vec2) {
        self.set_position(point - self.viewport * 0.5);
    }

    // --- Queries ---

    pub fn focus_position(&self) -> Vec2 {
        self.focus
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn view_center(&self) -> Vec2 {
        self.focus + self.viewport * 0.5
    }

    pub fn view_rect(&self) -> Rect {
        Rect::from_pos_size(self.focus, self.viewport)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.focus
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.focus
    }

    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.view_rect().overlaps(rect)
    }

    /// Back to the origin with no targets, shake or offsets. Bounds are
    /// dropped too; the next level sets its own.
    pub fn reset(&mut self) {
        *self = Self::new(self.viewport, self.smoothing, self.look_ahead_factor, self.seed);
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        match self.bounds {
            Some(b) => Vec2::new(
                clamp_range(p.x, b.x, b.right() - self.viewport.x),
                clamp_range(p.y, b.y, b.bottom() - self.viewport.y),
            ),
            None => p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEW: Vec2 = Vec2::new(320.0, 240.0);

    fn camera() -> CameraSystem {
        CameraSystem::new(VIEW, 10.0, 0.0, 7)
    }

    fn at(center: Vec2) -> impl Fn(Entity) -> Option<CameraTarget> {
        move |_| {
            Some(CameraTarget {
                center,
                velocity: Vec2::ZERO,
            })
        }
    }

    #[test]
    fn smoothing_moves_part_of_the_way() {
        let mut cam = camera();
        cam.set_target(Some(Entity::new(0, 0)));
        // Desired top-left is (160, 120) - (160, 120) = (0, 0) + 100 offset.
        cam.update(0.05, at(Vec2::new(260.0, 120.0)));
        assert_relative_eq!(cam.focus_position().x, 50.0);

        // smoothing * dt >= 1 lands exactly.
        cam.update(1.0, at(Vec2::new(260.0, 120.0)));
        assert_relative_eq!(cam.focus_position().x, 100.0);
    }

    #[test]
    fn focus_never_leaves_bounds() {
        let mut cam = camera();
        cam.set_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 500.0)));
        cam.set_target(Some(Entity::new(0, 0)));

        for far in [Vec2::new(-5000.0, -5000.0), Vec2::new(9000.0, 9000.0)] {
            cam.shake(50.0, 1.0);
            for _ in 0..30 {
                cam.update(0.1, at(far));
                let focus = cam.focus_position();
                assert!(focus.x >= 0.0 && focus.x <= 1000.0 - VIEW.x);
                assert!(focus.y >= 0.0 && focus.y <= 500.0 - VIEW.y);
            }
        }
    }

    #[test]
    fn level_smaller_than_view_pins_to_min() {
        let mut cam = camera();
        cam.set_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        cam.set_position(Vec2::new(50.0, 50.0));
        assert_eq!(cam.focus_position(), Vec2::ZERO);
    }

    #[test]
    fn set_position_snaps_without_smoothing() {
        let mut cam = camera();
        cam.center_on(Vec2::new(500.0, 400.0));
        assert_eq!(cam.focus_position(), Vec2::new(340.0, 280.0));
        assert_eq!(cam.view_center(), Vec2::new(500.0, 400.0));
        assert_eq!(cam.world_to_screen(Vec2::new(340.0, 280.0)), Vec2::ZERO);
        assert_eq!(cam.screen_to_world(Vec2::ZERO), Vec2::new(340.0, 280.0));
    }

    #[test]
    fn npc_focus_blocks_set_target_until_released() {
        let player = Entity::new(0, 0);
        let npc = Entity::new(1, 0);
        let other = Entity::new(2, 0);

        let mut cam = camera();
        cam.set_target(Some(player));
        cam.set_npc_target(npc);
        cam.set_target(Some(other));
        assert_eq!(cam.target(), Some(npc));

        cam.release_npc_focus();
        assert_eq!(cam.target(), Some(player));
        cam.set_target(Some(other));
        assert_eq!(cam.target(), Some(other));
    }

    #[test]
    fn npc_focus_releases_when_target_disappears() {
        let player = Entity::new(0, 0);
        let npc = Entity::new(1, 0);
        let mut cam = camera();
        cam.set_target(Some(player));
        cam.set_npc_target(npc);

        cam.update(0.1, |e| {
            (e == player).then_some(CameraTarget {
                center: Vec2::ZERO,
                velocity: Vec2::ZERO,
            })
        });
        assert!(!cam.has_npc_focus());
        assert_eq!(cam.target(), Some(player));
    }

    #[test]
    fn shake_decays_to_zero_and_is_seeded() {
        let mut a = camera();
        let mut b = camera();
        a.shake(10.0, 0.3);
        b.shake(10.0, 0.3);
        a.update(0.1, |_| None);
        b.update(0.1, |_| None);
        assert_eq!(a.focus_position(), b.focus_position());
        assert!(a.focus_position().length() <= 10.0 * 2f32.sqrt());

        for _ in 0..3 {
            a.update(0.1, |_| None);
        }
        assert!(!a.is_shaking());
        assert_eq!(a.focus_position(), Vec2::ZERO);
    }

    #[test]
    fn look_ahead_and_bias_offset_the_desired_origin() {
        let mut cam = CameraSystem::new(VIEW, 100.0, 0.5, 1);
        cam.set_target(Some(Entity::new(0, 0)));
        cam.set_look_ahead(Vec2::new(20.0, 0.0));
        cam.set_bias(Vec2::new(0.0, -10.0));
        cam.update(1.0, |_| {
            Some(CameraTarget {
                center: VIEW * 0.5,
                velocity: Vec2::new(40.0, 0.0),
            })
        });
        assert_eq!(cam.focus_position(), Vec2::new(40.0, -10.0));
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut cam = camera();
        cam.set_target(Some(Entity::new(0, 0)));
        cam.set_npc_target(Entity::new(1, 0));
        cam.set_position(Vec2::new(30.0, 30.0));
        cam.shake(5.0, 1.0);
        cam.reset();
        assert_eq!(cam.focus_position(), Vec2::ZERO);
        assert!(cam.target().is_none());
        assert!(!cam.has_npc_focus());
        assert!(!cam.is_shaking());
    }
}
