//! Tile property table mapping tile codes to material info.
//!
//! Provides solidity, mining hardness, and drop data for every tile.
//! Unknown codes resolve to air so grid queries never fail.

/// Numeric tile code stored in the grid.
pub type TileId = u8;

/// Well-known tile codes.
pub mod tile_id {
    use super::TileId;

    pub const AIR: TileId = 0;
    pub const GRASS: TileId = 1;
    pub const DIRT: TileId = 2;
    pub const STONE: TileId = 3;
    pub const COAL: TileId = 4;
    pub const IRON: TileId = 5;
    pub const WOOD: TileId = 6;
    pub const LEAVES: TileId = 7;
    pub const SAND: TileId = 8;
    pub const WATER: TileId = 9;
}

/// Properties for a single tile type.
#[derive(Debug, Clone)]
pub struct TileInfo {
    /// Display name, e.g. `"Stone"`.
    pub name: &'static str,
    /// Whether entities collide with this tile.
    pub solid: bool,
    /// Mining cost multiplier. `0.0` = nothing to mine.
    pub hardness: f32,
    /// Item code granted when the tile is broken (`0` = no drop).
    pub drop_item: u8,
}

// Helper macro to reduce boilerplate in the data array.
macro_rules! tile {
    ($name:expr, solid, $hardness:expr, $drop:expr) => {
        TileInfo {
            name: $name,
            solid: true,
            hardness: $hardness,
            drop_item: $drop,
        }
    };
    ($name:expr, non_solid, $hardness:expr, $drop:expr) => {
        TileInfo {
            name: $name,
            solid: false,
            hardness: $hardness,
            drop_item: $drop,
        }
    };
}

/// Static data array of all tile properties, indexed by tile code.
static TILE_DATA: &[TileInfo] = &[
    tile!("Air", non_solid, 0.0, 0),
    tile!("Grass", solid, 0.4, 2),
    tile!("Dirt", solid, 0.5, 2),
    tile!("Stone", solid, 1.5, 3),
    tile!("Coal", solid, 2.0, 4),
    tile!("Iron", solid, 3.0, 5),
    tile!("Wood", solid, 1.0, 6),
    tile!("Leaves", solid, 0.2, 7),
    tile!("Sand", solid, 0.3, 8),
    tile!("Water", non_solid, 99.0, 0),
];

/// Look up tile info by code. Unknown codes resolve to air.
pub fn tile_info(id: TileId) -> &'static TileInfo {
    TILE_DATA.get(id as usize).unwrap_or(&TILE_DATA[0])
}

/// Check if a tile code is solid.
pub fn is_solid(id: TileId) -> bool {
    tile_info(id).solid
}

/// Mining hardness for a tile code.
pub fn hardness(id: TileId) -> f32 {
    tile_info(id).hardness
}

/// Item granted when the tile is broken, if any.
pub fn drop_item(id: TileId) -> Option<u8> {
    let drop = tile_info(id).drop_item;
    (drop != 0).then_some(drop)
}

/// Whether the tile can be mined. Air has nothing to break and water
/// cannot be picked up.
pub fn is_breakable(id: TileId) -> bool {
    id != tile_id::AIR && id != tile_id::WATER
}

/// Whether light passes through (and recovers in) this tile. Leaves are
/// solid but let light through like open air.
pub fn transmits_light(id: TileId) -> bool {
    !is_solid(id) || id == tile_id::LEAVES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_empty() {
        let air = tile_info(tile_id::AIR);
        assert!(!air.solid);
        assert_eq!(air.hardness, 0.0);
        assert!(drop_item(tile_id::AIR).is_none());
    }

    #[test]
    fn stone_properties() {
        let stone = tile_info(tile_id::STONE);
        assert_eq!(stone.name, "Stone");
        assert!(stone.solid);
        assert_eq!(stone.hardness, 1.5);
        assert_eq!(drop_item(tile_id::STONE), Some(3));
    }

    #[test]
    fn grass_drops_dirt() {
        assert_eq!(drop_item(tile_id::GRASS), Some(tile_id::DIRT));
    }

    #[test]
    fn water_not_breakable_not_solid() {
        assert!(!is_solid(tile_id::WATER));
        assert!(!is_breakable(tile_id::WATER));
        assert!(drop_item(tile_id::WATER).is_none());
    }

    #[test]
    fn air_not_breakable() {
        assert!(!is_breakable(tile_id::AIR));
    }

    #[test]
    fn unknown_code_resolves_to_air() {
        let info = tile_info(200);
        assert_eq!(info.name, "Air");
        assert!(!is_solid(200));
        assert!(drop_item(200).is_none());
    }

    #[test]
    fn leaves_solid_but_translucent() {
        assert!(is_solid(tile_id::LEAVES));
        assert!(transmits_light(tile_id::LEAVES));
    }

    #[test]
    fn water_transmits_light() {
        assert!(transmits_light(tile_id::WATER));
    }
}
