//! Parkour goal markers and collection.
//!
//! World generation scatters goal cells above the terrain; touching one
//! collects it permanently and raises the best-tier counter.

use bevy_ecs::prelude::*;
use tracing::debug;

use bw_rs_world::physics::TILE_SIZE;

use crate::components::*;
use crate::game_world::{GameEvent, ParticleKind, PlayerProgress};
use crate::inventory::ItemStore;
use crate::quest::QuestLog;

/// Experience granted per goal tier.
pub const XP_PER_TIER: u32 = 15;

/// A reachable goal cell with a difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkourGoal {
    /// Goal cell.
    pub x: i32,
    pub y: i32,
    /// Difficulty tier, 1 and up.
    pub tier: u32,
    /// Set exactly once, permanently, on first touch.
    pub collected: bool,
}

impl ParkourGoal {
    pub fn new(x: i32, y: i32, tier: u32) -> Self {
        Self {
            x,
            y,
            tier,
            collected: false,
        }
    }
}

/// Collect every uncollected goal the player's box overlaps.
pub fn check_goals(
    world: &mut World,
    goals: &mut [ParkourGoal],
    store: &mut dyn ItemStore,
    quests: &mut QuestLog,
    events: &mut Vec<GameEvent>,
) {
    let player = {
        let mut q = world.query_filtered::<(&Position, &BoundingBox), With<Player>>();
        q.iter(world)
            .next()
            .map(|(pos, bb)| (pos.x, pos.y, bb.width, bb.height))
    };
    let Some((px, py, pw, ph)) = player else {
        return;
    };

    let mut reached_any = false;
    for goal in goals.iter_mut().filter(|g| !g.collected) {
        let gx = goal.x as f32 * TILE_SIZE;
        let gy = goal.y as f32 * TILE_SIZE;
        let overlaps =
            px < gx + TILE_SIZE && px + pw > gx && py < gy + TILE_SIZE && py + ph > gy;
        if !overlaps {
            continue;
        }
        goal.collected = true;
        reached_any = true;
        let xp = goal.tier * XP_PER_TIER;
        {
            let mut progress = world.resource_mut::<PlayerProgress>();
            if goal.tier > progress.max_parkour_tier {
                progress.max_parkour_tier = goal.tier;
            }
            progress.xp += xp;
        }
        debug!(tier = goal.tier, "parkour goal reached");
        events.push(GameEvent::GoalReached {
            tier: goal.tier,
            xp,
        });
        events.push(GameEvent::Message(format!(
            "Parkour Zone {} cleared! +{} XP",
            goal.tier, xp
        )));
        events.push(GameEvent::Particles {
            x: gx + TILE_SIZE / 2.0,
            y: gy + TILE_SIZE / 2.0,
            kind: ParticleKind::GoalBurst,
            count: 20,
        });
    }

    if reached_any {
        let mut progress = world.resource_mut::<PlayerProgress>();
        quests.evaluate(&mut progress, store, events);
    }
}
