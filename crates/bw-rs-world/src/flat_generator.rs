//! Flat test-world generation.
//!
//! Builds a deterministic layered world for tests and demo drivers:
//! air above the surface row, grass at the surface, four rows of dirt,
//! stone down to the bottom. Real terrain comes from an external
//! generator; the simulation only consumes the resulting grid.

use crate::grid::TileGrid;
use crate::tile_registry::tile_id;

/// Number of dirt rows between the grass surface and the stone below.
const DIRT_DEPTH: usize = 4;

/// Generate a flat world with the grass surface at `surface_row`.
pub fn generate_flat(width: usize, height: usize, surface_row: usize) -> TileGrid {
    let mut grid = TileGrid::new(width, height);
    for x in 0..width {
        for y in surface_row..height {
            let tile = if y == surface_row {
                tile_id::GRASS
            } else if y <= surface_row + DIRT_DEPTH {
                tile_id::DIRT
            } else {
                tile_id::STONE
            };
            grid.set_tile(x as i32, y as i32, tile);
        }
    }
    grid.recompute_all_light();
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LIGHT_MAX;

    #[test]
    fn layer_layout() {
        let grid = generate_flat(8, 16, 5);
        assert_eq!(grid.tile_at(3, 4), tile_id::AIR);
        assert_eq!(grid.tile_at(3, 5), tile_id::GRASS);
        assert_eq!(grid.tile_at(3, 6), tile_id::DIRT);
        assert_eq!(grid.tile_at(3, 9), tile_id::DIRT);
        assert_eq!(grid.tile_at(3, 10), tile_id::STONE);
        assert_eq!(grid.tile_at(3, 15), tile_id::STONE);
    }

    #[test]
    fn surface_is_solid_sky_is_not() {
        let grid = generate_flat(8, 16, 5);
        assert!(!grid.is_solid(0, 0));
        assert!(grid.is_solid(0, 5));
    }

    #[test]
    fn light_full_above_surface_dimmer_below() {
        let grid = generate_flat(8, 16, 5);
        assert_eq!(grid.light_at(2, 0), LIGHT_MAX);
        assert!(grid.light_at(2, 6) < grid.light_at(2, 4));
        assert!(grid.light_at(2, 15) < grid.light_at(2, 6));
    }
}
