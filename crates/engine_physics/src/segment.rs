// crates/engine_physics/src/segment.rs
//! Line-segment geometry: raycasts and one-way surfaces.

use engine_shared::Rect;
use glam::Vec2;

/// Determinant magnitude below which a ray and a segment count as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// How far below a surface an actor's feet may already be and still land on
/// it. Covers one frame of fall at typical speeds.
pub const SURFACE_SNAP_DISTANCE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    /// Unit normal on the solid side's outward face.
    pub normal: Vec2,
    /// Velocity of the surface itself (moving platforms); zero for world
    /// geometry.
    pub velocity: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2, normal: Vec2) -> Self {
        Self {
            start,
            end,
            normal: normal.normalize_or_zero(),
            velocity: Vec2::ZERO,
        }
    }

    /// Normal derived from the winding: the left-hand perpendicular in
    /// screen space (y down), so a segment drawn left-to-right faces up.
    pub fn with_derived_normal(start: Vec2, end: Vec2) -> Self {
        let dir = end - start;
        Self::new(start, end, Vec2::new(dir.y, -dir.x))
    }

    pub fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Faces up enough to be stood on.
    pub fn is_floor(&self) -> bool {
        self.normal.y < -0.5
    }

    /// Height of the segment at `x`, if `x` lies within its horizontal span.
    pub fn y_at(&self, x: f32) -> Option<f32> {
        let (min_x, max_x) = (self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        if x < min_x || x > max_x {
            return None;
        }
        let dx = self.end.x - self.start.x;
        if dx.abs() < PARALLEL_EPSILON {
            return Some(self.start.y.min(self.end.y));
        }
        let t = (x - self.start.x) / dx;
        Some(self.start.y + (self.end.y - self.start.y) * t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec2,
    pub normal: Vec2,
    pub distance: f32,
}

/// Closest intersection of the ray with any segment, `distance` in
/// `[0, max_distance)`. A zero direction never hits.
pub fn raycast<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<RaycastHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO || max_distance <= 0.0 {
        return None;
    }

    let mut best: Option<RaycastHit> = None;
    for segment in segments {
        let edge = segment.end - segment.start;
        let denom = dir.perp_dot(edge);
        if denom.abs() < PARALLEL_EPSILON {
            continue;
        }

        let to_start = segment.start - origin;
        let t = to_start.perp_dot(edge) / denom;
        let u = to_start.perp_dot(dir) / denom;

        if t < 0.0 || t >= max_distance || !(0.0..=1.0).contains(&u) {
            continue;
        }
        if best.is_some_and(|b| b.distance <= t) {
            continue;
        }
        best = Some(RaycastHit {
            point: origin + dir * t,
            normal: segment.normal,
            distance: t,
        });
    }
    best
}

/// Where an actor moving down lands on a one-way surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceContact {
    pub surface_y: f32,
    /// Velocity of the surface, to carry riders along.
    pub carry: Vec2,
}

/// Floors are one-way: only an actor that is not moving up and whose feet
/// are within `SURFACE_SNAP_DISTANCE` below the surface lands on it.
pub fn land_on_surfaces<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
    rect: &Rect,
    velocity: Vec2,
) -> Option<SurfaceContact> {
    if velocity.y < 0.0 {
        return None;
    }
    let feet = rect.bottom();
    let probe_x = rect.center().x;

    let mut best: Option<SurfaceContact> = None;
    for segment in segments {
        if !segment.is_floor() {
            continue;
        }
        let Some(surface_y) = segment.y_at(probe_x) else {
            continue;
        };
        let depth = feet - surface_y;
        if !(0.0..=SURFACE_SNAP_DISTANCE).contains(&depth) {
            continue;
        }
        if best.is_some_and(|b| b.surface_y <= surface_y) {
            continue;
        }
        best = Some(SurfaceContact {
            surface_y,
            carry: segment.velocity,
        });
    }
    best
}
