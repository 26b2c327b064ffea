//! Fixed-size tile grid with a derived per-column light profile.
//!
//! Cells hold tile codes; a parallel buffer holds light intensity computed
//! top-down per column. Out-of-range queries resolve to air rather than
//! failing, so callers never need bounds checks of their own.

use thiserror::Error;

use crate::tile_registry::{self, tile_id, TileId};

/// Lowest light level a fully buried cell can reach.
pub const LIGHT_MIN: f32 = 0.05;

/// Full daylight.
pub const LIGHT_MAX: f32 = 1.0;

/// Light recovered per open cell while scanning down a column.
const LIGHT_GAIN: f32 = 0.1;

/// Light lost per blocking cell while scanning down a column.
const LIGHT_LOSS: f32 = 0.15;

/// Errors raised when constructing a grid from caller-supplied cells.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("cell buffer holds {actual} tiles, expected {width}x{height} = {expected}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// The world's tile storage. Created once, mutated by mining and
/// placement, never resized.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<TileId>,
    light: Vec<f32>,
}

impl TileGrid {
    /// Create an all-air grid in full daylight.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![tile_id::AIR; width * height],
            light: vec![LIGHT_MAX; width * height],
        }
    }

    /// Build a grid from a row-major cell buffer (a world snapshot).
    pub fn from_cells(width: usize, height: usize, cells: Vec<TileId>) -> Result<Self, WorldError> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(WorldError::DimensionMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        let mut grid = Self {
            width,
            height,
            cells,
            light: vec![LIGHT_MAX; expected],
        };
        grid.recompute_all_light();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Tile code at `(x, y)`. Any out-of-range coordinate is air.
    pub fn tile_at(&self, x: i32, y: i32) -> TileId {
        self.index(x, y).map_or(tile_id::AIR, |i| self.cells[i])
    }

    /// Whether the tile at `(x, y)` blocks movement.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        tile_registry::is_solid(self.tile_at(x, y))
    }

    /// Light intensity at `(x, y)`. Out-of-range cells are fully lit.
    pub fn light_at(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(LIGHT_MAX, |i| self.light[i])
    }

    /// Overwrite one cell. Out-of-range writes are ignored. The caller is
    /// responsible for recomputing the column's light afterwards.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    /// Recompute the light profile of one column, top to bottom: open and
    /// leafy cells recover light, blocking cells attenuate it down to
    /// [`LIGHT_MIN`].
    pub fn recompute_column_light(&mut self, x: i32) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        let x = x as usize;
        let mut level = LIGHT_MAX;
        for y in 0..self.height {
            let tile = self.cells[y * self.width + x];
            if tile_registry::transmits_light(tile) {
                level = (level + LIGHT_GAIN).min(LIGHT_MAX);
            } else {
                level = (level - LIGHT_LOSS).max(LIGHT_MIN);
            }
            self.light[y * self.width + x] = level;
        }
    }

    /// Recompute light for every column (used at construction).
    pub fn recompute_all_light(&mut self) {
        for x in 0..self.width {
            self.recompute_column_light(x as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_air_and_lit() {
        let grid = TileGrid::new(8, 8);
        assert_eq!(grid.tile_at(3, 3), tile_id::AIR);
        assert_eq!(grid.light_at(3, 3), LIGHT_MAX);
    }

    #[test]
    fn from_cells_rejects_bad_length() {
        let err = TileGrid::from_cells(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            WorldError::DimensionMismatch { expected: 16, actual: 15, .. }
        ));
    }

    #[test]
    fn out_of_range_is_air() {
        let grid = TileGrid::new(4, 4);
        assert_eq!(grid.tile_at(-1, 0), tile_id::AIR);
        assert_eq!(grid.tile_at(0, -1), tile_id::AIR);
        assert_eq!(grid.tile_at(4, 0), tile_id::AIR);
        assert_eq!(grid.tile_at(0, 100), tile_id::AIR);
        assert!(!grid.is_solid(-5, -5));
        assert_eq!(grid.light_at(-1, -1), LIGHT_MAX);
    }

    #[test]
    fn set_tile_out_of_range_ignored() {
        let mut grid = TileGrid::new(4, 4);
        grid.set_tile(-1, 2, tile_id::STONE);
        grid.set_tile(9, 2, tile_id::STONE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.tile_at(x, y), tile_id::AIR);
            }
        }
    }

    #[test]
    fn light_attenuates_below_surface() {
        let mut grid = TileGrid::new(1, 6);
        for y in 2..6 {
            grid.set_tile(0, y, tile_id::STONE);
        }
        grid.recompute_column_light(0);

        assert_eq!(grid.light_at(0, 0), LIGHT_MAX);
        assert_eq!(grid.light_at(0, 1), LIGHT_MAX);
        assert!((grid.light_at(0, 2) - 0.85).abs() < 1e-6);
        assert!((grid.light_at(0, 3) - 0.70).abs() < 1e-6);
        assert!((grid.light_at(0, 4) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn light_floors_at_minimum() {
        let mut grid = TileGrid::new(1, 40);
        for y in 0..40 {
            grid.set_tile(0, y, tile_id::STONE);
        }
        grid.recompute_column_light(0);
        assert_eq!(grid.light_at(0, 39), LIGHT_MIN);
    }

    #[test]
    fn light_recovers_through_opening() {
        let mut grid = TileGrid::new(1, 10);
        for y in 0..10 {
            grid.set_tile(0, y, tile_id::STONE);
        }
        grid.recompute_column_light(0);
        let buried = grid.light_at(0, 9);

        // Carve a shaft through the upper half and relight.
        for y in 0..5 {
            grid.set_tile(0, y, tile_id::AIR);
        }
        grid.recompute_column_light(0);
        assert!(grid.light_at(0, 9) > buried);
    }

    #[test]
    fn leaves_transmit_light() {
        let mut grid = TileGrid::new(1, 3);
        grid.set_tile(0, 0, tile_id::LEAVES);
        grid.set_tile(0, 1, tile_id::STONE);
        grid.recompute_column_light(0);
        assert_eq!(grid.light_at(0, 0), LIGHT_MAX);
        assert!(grid.light_at(0, 1) < LIGHT_MAX);
    }

    #[test]
    fn breaking_a_tile_relights_the_column() {
        let mut grid = TileGrid::new(3, 8);
        for x in 0..3 {
            for y in 3..8 {
                grid.set_tile(x, y, tile_id::DIRT);
            }
        }
        grid.recompute_all_light();
        let before = grid.light_at(1, 4);

        grid.set_tile(1, 3, tile_id::AIR);
        grid.recompute_column_light(1);

        assert!(grid.light_at(1, 4) > before);
        // Neighbouring columns are untouched.
        assert_eq!(grid.light_at(0, 4), before);
    }
}
