//! Block breaking and placement.
//!
//! Breaking is a held-intent state machine: progress accrues only while
//! the same breakable cell stays targeted, and is discarded without
//! credit on any retarget or release.

use bevy_ecs::prelude::*;
use rand::Rng;
use tracing::debug;

use bw_rs_world::grid::TileGrid;
use bw_rs_world::item_registry;
use bw_rs_world::physics::{self, Body, TILE_SIZE};
use bw_rs_world::tile_registry::{self, tile_id, TileId};

use crate::components::*;
use crate::game_world::{GameEvent, ParticleKind, PlayerProgress};
use crate::input::FrameInput;
use crate::inventory::ItemStore;
use crate::quest::QuestLog;

/// Held-intent frames needed per point of hardness.
pub const TICKS_PER_HARDNESS: f32 = 45.0;

/// Per-frame chance of a cosmetic dust burst while breaking.
const DUST_CHANCE: f64 = 0.3;

/// An in-progress block break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningOperation {
    /// Targeted cell.
    pub x: i32,
    pub y: i32,
    /// Held-intent frames accrued on this cell.
    pub progress: u32,
    /// Frames required to break it.
    pub total: f32,
}

/// Why a placement request did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed,
    /// The selected item does not place as a tile.
    NotPlaceable,
    NoItem,
    OutOfReach,
    /// The target cell is not empty.
    Occupied,
    /// The target cell is under the player's own feet (or head).
    OverlapsPlayer,
}

fn player_state(world: &mut World) -> Option<(f32, f32, Body)> {
    let mut q = world.query_filtered::<(&Position, &BoundingBox), With<Player>>();
    q.iter(world).next().map(|(pos, bb)| {
        let body = Body::new(pos.x, pos.y, bb.width, bb.height);
        let (cx, cy) = body.center();
        (cx, cy, body)
    })
}

/// Advance the mining state machine one frame.
#[allow(clippy::too_many_arguments)]
pub fn system_mining(
    world: &mut World,
    grid: &mut TileGrid,
    op: &mut Option<MiningOperation>,
    input: &FrameInput,
    store: &mut dyn ItemStore,
    quests: &mut QuestLog,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    if !input.mine_held {
        *op = None;
        return;
    }
    let Some((cx, cy, _)) = player_state(world) else {
        *op = None;
        return;
    };
    let tx = (input.aim_x / TILE_SIZE).floor() as i32;
    let ty = (input.aim_y / TILE_SIZE).floor() as i32;
    if !physics::within_reach(cx, cy, tx, ty) {
        *op = None;
        return;
    }
    let tile = grid.tile_at(tx, ty);
    if !tile_registry::is_breakable(tile) {
        *op = None;
        return;
    }

    // Retargeting restarts from zero; no partial credit survives.
    let mut current = match op.take() {
        Some(m) if m.x == tx && m.y == ty => m,
        _ => MiningOperation {
            x: tx,
            y: ty,
            progress: 0,
            total: tile_registry::hardness(tile) * TICKS_PER_HARDNESS,
        },
    };
    current.progress += 1;
    if rng.gen_bool(DUST_CHANCE) {
        events.push(GameEvent::Particles {
            x: (tx as f32 + rng.gen::<f32>()) * TILE_SIZE,
            y: (ty as f32 + rng.gen::<f32>()) * TILE_SIZE,
            kind: ParticleKind::BlockDust(tile),
            count: 1,
        });
    }

    if (current.progress as f32) < current.total {
        *op = Some(current);
        return;
    }

    // Broke through.
    if let Some(drop) = tile_registry::drop_item(tile) {
        store.grant_one(drop);
        events.push(GameEvent::ItemGranted { item: drop });
    }
    grid.set_tile(tx, ty, tile_id::AIR);
    grid.recompute_column_light(tx);
    debug!(x = tx, y = ty, tile, "block broken");
    events.push(GameEvent::BlockBroken { x: tx, y: ty, tile });
    events.push(GameEvent::Particles {
        x: (tx as f32 + 0.5) * TILE_SIZE,
        y: (ty as f32 + 0.5) * TILE_SIZE,
        kind: ParticleKind::BlockDust(tile),
        count: 8,
    });
    if tile == tile_id::STONE {
        let mut progress = world.resource_mut::<PlayerProgress>();
        progress.mines += 1;
        quests.evaluate(&mut progress, store, events);
    }
}

/// Place the selected item into an empty cell within reach.
pub fn place_block(
    world: &mut World,
    grid: &mut TileGrid,
    input: &FrameInput,
    store: &mut dyn ItemStore,
    events: &mut Vec<GameEvent>,
) -> PlaceOutcome {
    let Some(tile) = item_registry::placeable_as(input.selected_item) else {
        return PlaceOutcome::NotPlaceable;
    };
    if store.count(input.selected_item) == 0 {
        return PlaceOutcome::NoItem;
    }
    let Some((cx, cy, body)) = player_state(world) else {
        return PlaceOutcome::OutOfReach;
    };
    let tx = (input.aim_x / TILE_SIZE).floor() as i32;
    let ty = (input.aim_y / TILE_SIZE).floor() as i32;
    if !physics::within_reach(cx, cy, tx, ty) {
        return PlaceOutcome::OutOfReach;
    }
    if grid.tile_at(tx, ty) != tile_id::AIR {
        return PlaceOutcome::Occupied;
    }
    let (x0, x1, y0, y1) = body.tile_span();
    if tx >= x0 && tx <= x1 && ty >= y0 && ty <= y1 {
        return PlaceOutcome::OverlapsPlayer;
    }

    store.consume_one(input.selected_item);
    grid.set_tile(tx, ty, tile);
    grid.recompute_column_light(tx);
    debug!(x = tx, y = ty, tile, "block placed");
    events.push(GameEvent::BlockPlaced { x: tx, y: ty, tile });
    PlaceOutcome::Placed
}

/// The cell a world-space point falls in.
pub fn point_to_cell(x: f32, y: f32) -> (i32, i32) {
    (
        (x / TILE_SIZE).floor() as i32,
        (y / TILE_SIZE).floor() as i32,
    )
}

/// Frames needed to break a tile of the given code.
pub fn frames_to_break(tile: TileId) -> u32 {
    (tile_registry::hardness(tile) * TICKS_PER_HARDNESS).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_to_break_rounds_up() {
        // Stone: 1.5 * 45 = 67.5 -> 68 frames.
        assert_eq!(frames_to_break(tile_id::STONE), 68);
        // Dirt: 0.5 * 45 = 22.5 -> 23 frames.
        assert_eq!(frames_to_break(tile_id::DIRT), 23);
        // Wood: 1.0 * 45 = 45 exactly.
        assert_eq!(frames_to_break(tile_id::WOOD), 45);
    }

    #[test]
    fn point_to_cell_floors_negatives() {
        assert_eq!(point_to_cell(39.9, 40.0), (0, 1));
        assert_eq!(point_to_cell(-0.1, -41.0), (-1, -2));
    }
}
