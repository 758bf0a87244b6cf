// crates/engine_physics/src/lib.rs
//! World collision: a solid/empty tile grid, line segments for raycasts and
//! one-way floors, double-buffered temporary surfaces and the per-tick list
//! of object colliders.

mod collider;
mod segment;
mod tile_grid;

pub use collider::{overlapping, Collider, TeamFilter};
pub use segment::{land_on_surfaces, raycast, RaycastHit, Segment, SurfaceContact, SURFACE_SNAP_DISTANCE};
pub use tile_grid::{resolve_collision, TileCollision, TileGrid};

use engine_ecs::{Entity, FixedArray};
use engine_shared::{Rect, Team};
use glam::Vec2;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("tile grid expects {expected} cells, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },
    #[error("tile grid of {columns}x{rows} cells is too large")]
    GridTooLarge { columns: usize, rows: usize },
    #[error("tile size must be positive and finite, got {width}x{height}")]
    InvalidTileSize { width: f32, height: f32 },
}

/// Holds the world geometry and answers contact queries. Queries never fail:
/// before any geometry is set they simply report no contact.
pub struct CollisionSystem {
    grid: Option<TileGrid>,
    segments: Vec<Segment>,
    // Registered this frame, collidable from the next.
    pending_surfaces: Vec<Segment>,
    active_surfaces: Vec<Segment>,
    colliders: FixedArray<Collider>,
    dropped_colliders: usize,
}

impl CollisionSystem {
    pub fn new(collider_capacity: usize) -> Self {
        Self {
            grid: None,
            segments: Vec::new(),
            pending_surfaces: Vec::new(),
            active_surfaces: Vec::new(),
            colliders: FixedArray::with_capacity(collider_capacity),
            dropped_colliders: 0,
        }
    }

    // --- Static geometry ---

    pub fn set_tile_grid(&mut self, grid: TileGrid) {
        debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            "collision grid set"
        );
        self.grid = Some(grid);
    }

    pub fn tile_grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        debug!(count = segments.len(), "collision segments set");
        self.segments = segments;
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    // --- Queries ---

    /// Contacts between the box and solid tiles. No grid means no contact.
    pub fn check_tile_collision(&self, x: f32, y: f32, w: f32, h: f32, vx: f32, vy: f32) -> TileCollision {
        match &self.grid {
            Some(grid) => grid.check(x, y, w, h, vx, vy),
            None => TileCollision::default(),
        }
    }

    pub fn resolve_collision(&self, result: &TileCollision, position: &mut Vec2, velocity: &mut Vec2, size: Vec2) {
        resolve_collision(result, position, velocity, size);
    }

    /// Closest hit against world segments and the active temporary surfaces.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RaycastHit> {
        raycast(
            self.segments.iter().chain(self.active_surfaces.iter()),
            origin,
            direction,
            max_distance,
        )
    }

    /// Landing on a floor segment or active temporary surface from above.
    pub fn check_surface_collision(&self, rect: &Rect, velocity: Vec2) -> Option<SurfaceContact> {
        land_on_surfaces(
            self.segments.iter().chain(self.active_surfaces.iter()),
            rect,
            velocity,
        )
    }

    // --- Temporary surfaces ---

    pub fn register_temporary_surface(&mut self, surface: Segment) {
        self.pending_surfaces.push(surface);
    }

    /// Once per frame: surfaces registered since the last call become the
    /// active set, replacing the previous one.
    pub fn update_temporary_surfaces(&mut self) {
        std::mem::swap(&mut self.active_surfaces, &mut self.pending_surfaces);
        self.pending_surfaces.clear();
    }

    pub fn temporary_surfaces(&self) -> &[Segment] {
        &self.active_surfaces
    }

    // --- Object colliders ---

    /// Returns false when the collider list is full; the collider is dropped
    /// for this tick.
    pub fn register_collider(&mut self, owner: Entity, rect: Rect, team: Team) -> bool {
        match self.colliders.push(Collider { owner, rect, team }) {
            Ok(()) => true,
            Err(_) => {
                if self.dropped_colliders == 0 {
                    warn!(
                        capacity = self.colliders.capacity(),
                        "collider list full, dropping colliders"
                    );
                }
                self.dropped_colliders += 1;
                false
            }
        }
    }

    pub fn clear_colliders(&mut self) {
        self.colliders.clear();
        self.dropped_colliders = 0;
    }

    pub fn colliders(&self) -> &[Collider] {
        self.colliders.as_slice()
    }

    pub fn overlapping<'a>(
        &'a self,
        rect: &'a Rect,
        exclude: Entity,
        filter: TeamFilter,
    ) -> impl Iterator<Item = &'a Collider> + 'a {
        overlapping(self.colliders.as_slice(), rect, exclude, filter)
    }

    /// Drop all geometry, surfaces and colliders.
    pub fn reset(&mut self) {
        self.grid = None;
        self.segments.clear();
        self.pending_surfaces.clear();
        self.active_surfaces.clear();
        self.clear_colliders();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn platform() -> Segment {
        Segment::with_derived_normal(Vec2::new(0.0, 100.0), Vec2::new(64.0, 100.0))
    }

    #[test]
    fn empty_system_reports_nothing() {
        let collision = CollisionSystem::new(4);
        assert!(!collision.check_tile_collision(0.0, 0.0, 32.0, 32.0, 0.0, 10.0).any());
        assert!(collision.raycast(Vec2::ZERO, Vec2::X, 100.0).is_none());
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(collision.check_surface_collision(&rect, Vec2::Y).is_none());
    }

    #[test]
    fn temporary_surface_is_collidable_one_frame_later() {
        let mut collision = CollisionSystem::new(4);
        let down = Vec2::new(32.0, 50.0);

        // Frame N: registered while the frame runs.
        collision.update_temporary_surfaces();
        collision.register_temporary_surface(platform());
        assert!(collision.raycast(down, Vec2::Y, 200.0).is_none());

        // Frame N+1.
        collision.update_temporary_surfaces();
        let hit = collision.raycast(down, Vec2::Y, 200.0).unwrap();
        assert_relative_eq!(hit.distance, 50.0);
        assert_eq!(collision.temporary_surfaces().len(), 1);

        // Not re-registered during N+1, so gone in N+2.
        collision.update_temporary_surfaces();
        assert!(collision.raycast(down, Vec2::Y, 200.0).is_none());
    }

    #[test]
    fn lands_on_active_moving_surface() {
        let mut collision = CollisionSystem::new(4);
        collision.register_temporary_surface(platform().moving(Vec2::new(0.0, -20.0)));
        collision.update_temporary_surfaces();

        let rect = Rect::new(16.0, 70.0, 16.0, 32.0);
        let contact = collision.check_surface_collision(&rect, Vec2::new(0.0, 5.0)).unwrap();
        assert_relative_eq!(contact.surface_y, 100.0);
        assert_eq!(contact.carry, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn collider_list_is_bounded_and_cleared() {
        let mut collision = CollisionSystem::new(1);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(collision.register_collider(Entity::new(0, 0), rect, Team::Player));
        assert!(!collision.register_collider(Entity::new(1, 0), rect, Team::Enemy));
        assert_eq!(collision.colliders().len(), 1);

        let probe = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(collision.overlapping(&probe, Entity::NULL, TeamFilter::Any).count(), 1);

        collision.clear_colliders();
        assert!(collision.colliders().is_empty());
    }

    #[test]
    fn end_to_end_fall_onto_solid_row() {
        let mut collision = CollisionSystem::new(4);
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0, 0,
            1, 1, 1, 1,
        ];
        collision.set_tile_grid(TileGrid::new(4, 2, 32.0, 32.0, cells).unwrap());

        let size = Vec2::splat(32.0);
        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::new(0.0, 50.0);
        position += velocity * 0.1;

        let hit = collision.check_tile_collision(position.x, position.y, size.x, size.y, velocity.x, velocity.y);
        assert!(hit.grounded);
        collision.resolve_collision(&hit, &mut position, &mut velocity, size);
        assert_relative_eq!(position.y, 0.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut collision = CollisionSystem::new(4);
        collision.set_tile_grid(TileGrid::new(1, 1, 32.0, 32.0, vec![1]).unwrap());
        collision.set_segments(vec![platform()]);
        collision.register_temporary_surface(platform());
        collision.register_collider(Entity::new(0, 0), Rect::new(0.0, 0.0, 1.0, 1.0), Team::None);

        collision.reset();
        collision.update_temporary_surfaces();
        assert!(collision.tile_grid().is_none());
        assert!(collision.segments().is_empty());
        assert!(collision.temporary_surfaces().is_empty());
        assert!(collision.colliders().is_empty());
    }
}
