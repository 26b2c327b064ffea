//! World data: tile definitions, the tile grid with its light profile,
//! AABB physics helpers, and flat world generation.

pub mod flat_generator;
pub mod grid;
pub mod item_registry;
pub mod physics;
pub mod tile_registry;
