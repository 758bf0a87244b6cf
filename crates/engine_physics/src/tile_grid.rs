// crates/engine_physics/src/tile_grid.rs
//! Tile-grid contact classification and position-correction.

use glam::Vec2;

use crate::PhysicsError;

/// Shrinks the far edges of a box before converting to cell indices so a box
/// that ends exactly on a tile boundary does not claim the next column.
const EDGE_EPSILON: f32 = 1e-3;

/// Rectangular solid/empty grid. Cells outside the grid are solid, which
/// gives every level an implicit boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    tile_width: f32,
    tile_height: f32,
    cells: Vec<i32>,
}

impl TileGrid {
    pub fn new(
        columns: usize,
        rows: usize,
        tile_width: f32,
        tile_height: f32,
        cells: Vec<i32>,
    ) -> Result<Self, PhysicsError> {
        let expected = columns
            .checked_mul(rows)
            .ok_or(PhysicsError::GridTooLarge { columns, rows })?;
        if cells.len() != expected {
            return Err(PhysicsError::GridSizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        if !(tile_width > 0.0 && tile_width.is_finite() && tile_height > 0.0 && tile_height.is_finite()) {
            return Err(PhysicsError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        Ok(Self {
            columns,
            rows,
            tile_width,
            tile_height,
            cells,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    /// Raw cell value; out-of-grid reads as solid (1).
    pub fn cell(&self, column: i64, row: i64) -> i32 {
        if column < 0 || row < 0 || column >= self.columns as i64 || row >= self.rows as i64 {
            return 1;
        }
        self.cells[row as usize * self.columns + column as usize]
    }

    pub fn is_solid(&self, column: i64, row: i64) -> bool {
        self.cell(column, row) > 0
    }

    pub fn is_solid_at(&self, point: Vec2) -> bool {
        let column = (point.x / self.tile_width).floor() as i64;
        let row = (point.y / self.tile_height).floor() as i64;
        self.is_solid(column, row)
    }

    /// Classify contacts between the box and solid cells.
    ///
    /// Rows scanned include the row the box bottom rests on, so an actor
    /// standing exactly on a boundary still reads as grounded. Columns and
    /// the top edge need real penetration to register.
    ///
    /// Only faces bordering an empty cell can push the box out, so the seam
    /// between two floor tiles is never a wall. A cell with no open face
    /// falls back to all four.
    pub fn check(&self, x: f32, y: f32, w: f32, h: f32, vx: f32, vy: f32) -> TileCollision {
        let mut result = TileCollision::default();

        let first_col = (x / self.tile_width).floor() as i64;
        let last_col = ((x + w - EDGE_EPSILON) / self.tile_width).floor() as i64;
        let first_row = (y / self.tile_height).floor() as i64;
        let last_row = ((y + h) / self.tile_height).floor() as i64;

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                if !self.is_solid(col, row) {
                    continue;
                }

                let left = col as f32 * self.tile_width;
                let top = row as f32 * self.tile_height;
                let right = left + self.tile_width;
                let bottom = top + self.tile_height;

                // Penetration from each side of the tile.
                let from_left = (x + w) - left;
                let from_right = right - x;
                let from_top = (y + h) - top;
                let from_bottom = bottom - y;

                let mut open_top = !self.is_solid(col, row - 1);
                let mut open_bottom = !self.is_solid(col, row + 1);
                let mut open_left = !self.is_solid(col - 1, row);
                let mut open_right = !self.is_solid(col + 1, row);
                if !(open_top || open_bottom || open_left || open_right) {
                    (open_top, open_bottom, open_left, open_right) = (true, true, true, true);
                }

                // (penetration, true for ground)
                let vertical = match (open_top, open_bottom) {
                    (true, true) if from_top == from_bottom => Some((from_top, vy >= 0.0)),
                    (true, true) => Some((from_top.min(from_bottom), from_top < from_bottom)),
                    (true, false) => Some((from_top, true)),
                    (false, true) => Some((from_bottom, false)),
                    (false, false) => None,
                };
                // (penetration, true for a wall on the right)
                let horizontal = match (open_left, open_right) {
                    (true, true) if from_left == from_right => Some((from_left, vx >= 0.0)),
                    (true, true) => Some((from_left.min(from_right), from_left < from_right)),
                    (true, false) => Some((from_left, true)),
                    (false, true) => Some((from_right, false)),
                    (false, false) => None,
                };

                // Equal penetration on both axes resolves vertically.
                let use_vertical = match (vertical, horizontal) {
                    (Some((depth_v, _)), Some((depth_h, _))) => depth_v <= depth_h,
                    (Some(_), None) => true,
                    (None, _) => false,
                };

                if use_vertical {
                    let Some((depth, ground)) = vertical else {
                        continue;
                    };
                    if depth < 0.0 {
                        continue;
                    }
                    if ground {
                        result.add_ground(top);
                    } else if depth > 0.0 {
                        result.add_ceiling(bottom);
                    }
                } else if let Some((depth, wall_on_right)) = horizontal {
                    if depth <= 0.0 {
                        continue;
                    }
                    if wall_on_right {
                        result.add_right_wall(left);
                    } else {
                        result.add_left_wall(right);
                    }
                }
            }
        }

        result.normal = result.normal.normalize_or_zero();
        result
    }
}

/// Outcome of a tile-collision query. Several flags may be set at once when
/// the box touches geometry on more than one side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileCollision {
    pub grounded: bool,
    pub ceiling: bool,
    pub left_wall: bool,
    pub right_wall: bool,
    /// Unit contact normal, or zero when nothing was touched.
    pub normal: Vec2,
    /// Highest tile top among ground contacts.
    pub ground_y: f32,
    /// Lowest tile bottom among ceiling contacts.
    pub ceiling_y: f32,
    /// Rightmost tile edge among left-wall contacts.
    pub left_wall_x: f32,
    /// Leftmost tile edge among right-wall contacts.
    pub right_wall_x: f32,
}

impl TileCollision {
    pub fn any(&self) -> bool {
        self.grounded || self.ceiling || self.left_wall || self.right_wall
    }

    fn add_ground(&mut self, tile_top: f32) {
        self.ground_y = if self.grounded { self.ground_y.min(tile_top) } else { tile_top };
        if !self.grounded {
            self.normal += Vec2::NEG_Y;
        }
        self.grounded = true;
    }

    fn add_ceiling(&mut self, tile_bottom: f32) {
        self.ceiling_y = if self.ceiling { self.ceiling_y.max(tile_bottom) } else { tile_bottom };
        if !self.ceiling {
            self.normal += Vec2::Y;
        }
        self.ceiling = true;
    }

    fn add_left_wall(&mut self, tile_right: f32) {
        self.left_wall_x = if self.left_wall { self.left_wall_x.max(tile_right) } else { tile_right };
        if !self.left_wall {
            self.normal += Vec2::X;
        }
        self.left_wall = true;
    }

    fn add_right_wall(&mut self, tile_left: f32) {
        self.right_wall_x = if self.right_wall { self.right_wall_x.min(tile_left) } else { tile_left };
        if !self.right_wall {
            self.normal += Vec2::NEG_X;
        }
        self.right_wall = true;
    }
}

/// Snap to the tile boundary on each colliding side and zero that axis's
/// velocity. Position-correction only; no impulses.
pub fn resolve_collision(
    result: &TileCollision,
    position: &mut Vec2,
    velocity: &mut Vec2,
    size: Vec2,
) {
    if result.grounded {
        position.y = result.ground_y - size.y;
        velocity.y = 0.0;
    } else if result.ceiling {
        position.y = result.ceiling_y;
        velocity.y = 0.0;
    }

    if result.left_wall && !result.right_wall {
        position.x = result.left_wall_x;
        velocity.x = 0.0;
    } else if result.right_wall && !result.left_wall {
        position.x = result.right_wall_x - size.x;
        velocity.x = 0.0;
    } else if result.left_wall && result.right_wall {
        // Wedged between two walls: stop, keep position.
        velocity.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 4x3 grid of 32px tiles, bottom row solid.
    fn floor_grid() -> TileGrid {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0, 0,
            0, 0, 0, 0,
            1, 1, 1, 1,
        ];
        TileGrid::new(4, 3, 32.0, 32.0, cells).unwrap()
    }

    #[test]
    fn rejects_mismatched_cell_count() {
        let err = TileGrid::new(2, 2, 32.0, 32.0, vec![0; 3]).unwrap_err();
        assert_eq!(err, PhysicsError::GridSizeMismatch { expected: 4, actual: 3 });
        assert!(TileGrid::new(1, 1, 0.0, 32.0, vec![0]).is_err());
    }

    #[test]
    fn rejects_overflowing_dimensions_and_non_finite_tiles() {
        let err = TileGrid::new(usize::MAX, 2, 16.0, 16.0, Vec::new()).unwrap_err();
        assert_eq!(err, PhysicsError::GridTooLarge { columns: usize::MAX, rows: 2 });
        assert!(TileGrid::new(1, 1, f32::NAN, 16.0, vec![0]).is_err());
        assert!(TileGrid::new(1, 1, 16.0, f32::INFINITY, vec![0]).is_err());
    }

    #[test]
    fn resting_on_boundary_with_zero_velocity_is_grounded() {
        let grid = floor_grid();
        let hit = grid.check(40.0, 32.0, 32.0, 32.0, 0.0, 0.0);
        assert!(hit.grounded);
        assert!(!hit.ceiling);
        assert!(!hit.left_wall && !hit.right_wall);
        assert_relative_eq!(hit.ground_y, 64.0);
        assert_eq!(hit.normal, Vec2::NEG_Y);
    }

    #[test]
    fn jumping_into_a_block_reports_ceiling() {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        let grid = TileGrid::new(3, 3, 32.0, 32.0, cells).unwrap();
        // Head 4px into the bottom of the middle block.
        let hit = grid.check(32.0, 60.0, 32.0, 20.0, 0.0, -100.0);
        assert!(hit.ceiling);
        assert!(!hit.grounded);
        assert_relative_eq!(hit.ceiling_y, 64.0);
        assert_eq!(hit.normal, Vec2::Y);
    }

    #[test]
    fn walls_are_classified_by_smaller_horizontal_overlap() {
        #[rustfmt::skip]
        let cells = vec![
            1, 0, 0, 1,
            1, 0, 0, 1,
            1, 1, 1, 1,
        ];
        let grid = TileGrid::new(4, 3, 32.0, 32.0, cells).unwrap();

        let left = grid.check(28.0, 20.0, 24.0, 30.0, -10.0, 0.0);
        assert!(left.left_wall);
        assert!(!left.right_wall);
        assert_relative_eq!(left.left_wall_x, 32.0);

        let right = grid.check(76.0, 20.0, 24.0, 30.0, 10.0, 0.0);
        assert!(right.right_wall);
        assert_relative_eq!(right.right_wall_x, 96.0);
    }

    #[test]
    fn corner_of_neighbouring_column_is_not_a_wall() {
        let grid = floor_grid();
        // Box spans exactly column 1; column 2 only touches its right edge.
        let hit = grid.check(32.0, 32.0, 32.0, 32.0, 5.0, 0.0);
        assert!(hit.grounded);
        assert!(!hit.right_wall);
    }

    #[test]
    fn floor_seams_are_not_walls() {
        // 6x3 grid of 16px tiles, bottom row solid.
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0,
            1, 1, 1, 1, 1, 1,
        ];
        let grid = TileGrid::new(6, 3, 16.0, 16.0, cells).unwrap();

        // Sunk 0.27px into the floor, leading edge 0.1px past the seam at 32.
        let hit = grid.check(8.1, 8.27, 24.0, 24.0, 40.0, 16.0);
        assert!(hit.grounded);
        assert!(!hit.right_wall && !hit.left_wall);
        assert_eq!(hit.normal, Vec2::NEG_Y);

        let mut pos = Vec2::new(8.1, 8.27);
        let mut vel = Vec2::new(40.0, 16.0);
        resolve_collision(&hit, &mut pos, &mut vel, Vec2::splat(24.0));
        assert_relative_eq!(pos.x, 8.1);
        assert_relative_eq!(pos.y, 8.0);
        assert_eq!(vel.x, 40.0);

        // Walking left over the seam at 16.
        let hit = grid.check(15.9, 8.27, 24.0, 24.0, -40.0, 16.0);
        assert!(hit.grounded);
        assert!(!hit.right_wall && !hit.left_wall);
    }

    #[test]
    fn equal_overlap_at_a_corner_lands_on_top() {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        let grid = TileGrid::new(3, 3, 32.0, 32.0, cells).unwrap();
        // 4px into the block's top-left corner on both axes.
        let hit = grid.check(20.0, 20.0, 16.0, 16.0, 10.0, 10.0);
        assert!(hit.grounded);
        assert!(!hit.right_wall && !hit.left_wall);
        assert_relative_eq!(hit.ground_y, 32.0);
    }

    #[test]
    fn centred_horizontal_overlap_follows_velocity() {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ];
        let grid = TileGrid::new(3, 3, 32.0, 32.0, cells).unwrap();
        // Box centred on the block: 36px from either side, 40px vertically.
        let moving_right = grid.check(28.0, 24.0, 40.0, 48.0, 10.0, 0.0);
        assert!(moving_right.right_wall);
        assert!(!moving_right.left_wall && !moving_right.grounded);
        assert_relative_eq!(moving_right.right_wall_x, 32.0);

        let moving_left = grid.check(28.0, 24.0, 40.0, 48.0, -10.0, 0.0);
        assert!(moving_left.left_wall);
        assert!(!moving_left.right_wall);
        assert_relative_eq!(moving_left.left_wall_x, 64.0);

        let still = grid.check(28.0, 24.0, 40.0, 48.0, 0.0, 0.0);
        assert!(still.right_wall);
    }

    #[test]
    fn outside_the_grid_is_solid() {
        let grid = floor_grid();
        let hit = grid.check(-10.0, 10.0, 20.0, 20.0, -5.0, 0.0);
        assert!(hit.left_wall);
        assert_relative_eq!(hit.left_wall_x, 0.0);
        assert!(grid.is_solid(-1, 0));
        assert!(grid.is_solid(0, 99));
        assert!(!grid.is_solid_at(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn ground_and_wall_in_one_query() {
        #[rustfmt::skip]
        let cells = vec![
            0, 0, 1,
            1, 1, 1,
        ];
        let grid = TileGrid::new(3, 2, 32.0, 32.0, cells).unwrap();
        let hit = grid.check(38.0, 2.0, 30.0, 32.0, 20.0, 10.0);
        assert!(hit.grounded);
        assert!(hit.right_wall);
        assert_relative_eq!(hit.normal.length(), 1.0, epsilon = 1e-5);
        assert!(hit.normal.x < 0.0 && hit.normal.y < 0.0);
    }

    #[test]
    fn resolve_snaps_and_zeroes_velocity() {
        let grid = floor_grid();
        let mut pos = Vec2::new(10.0, 40.0);
        let mut vel = Vec2::new(30.0, 200.0);
        let hit = grid.check(pos.x, pos.y, 32.0, 32.0, vel.x, vel.y);
        resolve_collision(&hit, &mut pos, &mut vel, Vec2::splat(32.0));
        assert_relative_eq!(pos.y, 32.0);
        assert_eq!(vel.y, 0.0);
        assert_eq!(vel.x, 30.0);
    }
}
