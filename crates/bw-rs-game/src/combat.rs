//! Combat resolution: melee sweeps, the shared damage pipeline, death
//! credit, and loot rolls.

use bevy_ecs::prelude::*;
use rand::Rng;
use tracing::debug;

use bw_rs_world::item_registry::item_id;
use bw_rs_world::tile_registry::tile_id;

use crate::components::*;
use crate::game_world::{GameEvent, ParticleKind, PlayerProgress};
use crate::inventory::ItemStore;
use crate::mob_registry::MobKind;
use crate::quest::QuestLog;

/// Melee sweep radius from the player's centre.
pub const MELEE_RANGE: f32 = 60.0;

/// Damage per melee hit.
pub const MELEE_DAMAGE: f32 = 4.0;

/// Frames between melee swings.
pub const MELEE_COOLDOWN_FRAMES: u32 = 20;

/// Hit feedback frames from a melee hit.
pub const MELEE_HIT_FLASH: u32 = 10;

/// Knockback pop applied to a meleed mob (x is scaled by facing).
pub const MELEE_KNOCKBACK: (f32, f32) = (3.0, -3.0);

/// Knockback applied to the player on mob contact (x is scaled away from
/// the mob).
pub const CONTACT_KNOCKBACK: (f32, f32) = (5.0, -4.0);

/// Damage immunity frames after the player is hurt.
pub const HURT_INVINCIBILITY: u32 = 40;

/// Chance a dying mob drops a material.
const MATERIAL_DROP_CHANCE: f64 = 0.4;

/// Chance a dying skeleton also drops an arrow.
const SKELETON_ARROW_DROP_CHANCE: f64 = 0.5;

/// What dealt a mob's damage; arrow kills earn bow credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Melee,
    Arrow,
}

/// Contact range below which a mob hurts the player, derived from the
/// two bodies' widths.
pub fn contact_threshold(mob_width: f32, player_width: f32) -> f32 {
    (mob_width + player_width) / 1.5
}

/// Swing at every mob in range on the faced side. Gated by the melee
/// cooldown; all qualifying mobs are hit in the same frame.
pub fn player_melee_attack(
    world: &mut World,
    rng: &mut impl Rng,
    store: &mut dyn ItemStore,
    quests: &mut QuestLog,
    events: &mut Vec<GameEvent>,
) {
    let player = {
        let mut q =
            world.query_filtered::<(Entity, &Position, &BoundingBox, &Facing), With<Player>>();
        q.iter(world)
            .next()
            .map(|(e, pos, bb, facing)| {
                (e, pos.x + bb.width / 2.0, pos.y + bb.height / 2.0, facing.0)
            })
    };
    let Some((entity, px, py, facing)) = player else {
        return;
    };

    if let Some(mut cooldown) = world.get_mut::<MeleeCooldown>(entity) {
        if cooldown.0 > 0 {
            return;
        }
        cooldown.0 = MELEE_COOLDOWN_FRAMES;
    }

    let targets: Vec<(Entity, f32, f32)> = {
        let mut q = world
            .query_filtered::<(Entity, &Position, &BoundingBox), (With<Mob>, Without<Dead>)>();
        q.iter(world)
            .map(|(e, pos, bb)| (e, pos.x + bb.width / 2.0, pos.y + bb.height / 2.0))
            .collect()
    };

    let mut killed_any = false;
    for (target, mx, my) in targets {
        let dx = mx - px;
        let dy = my - py;
        if (dx * dx + dy * dy).sqrt() >= MELEE_RANGE {
            continue;
        }
        let side = if dx > 0.0 {
            1.0
        } else if dx < 0.0 {
            -1.0
        } else {
            0.0
        };
        if side != facing {
            continue;
        }
        killed_any |= damage_mob(
            world,
            target,
            MELEE_DAMAGE,
            Some((facing * MELEE_KNOCKBACK.0, MELEE_KNOCKBACK.1)),
            MELEE_HIT_FLASH,
            DamageSource::Melee,
            rng,
            store,
            events,
        );
    }

    if killed_any {
        let mut progress = world.resource_mut::<PlayerProgress>();
        quests.evaluate(&mut progress, store, events);
    }
}

/// Apply damage to a mob: clamp health, set hit feedback, force aggro,
/// apply knockback, and on death grant credit, roll loot, and mark the
/// entity for cleanup. Returns `true` when the mob died.
///
/// Already-dead mobs are ignored so a death is processed exactly once.
#[allow(clippy::too_many_arguments)]
pub fn damage_mob(
    world: &mut World,
    entity: Entity,
    amount: f32,
    knockback: Option<(f32, f32)>,
    flash: u32,
    source: DamageSource,
    rng: &mut impl Rng,
    store: &mut dyn ItemStore,
    events: &mut Vec<GameEvent>,
) -> bool {
    if world.get::<Dead>(entity).is_some() {
        return false;
    }
    let Some(&EntityId(id)) = world.get::<EntityId>(entity) else {
        return false;
    };
    let Some(&kind) = world.get::<MobKind>(entity) else {
        return false;
    };
    let center = world
        .get::<Position>(entity)
        .zip(world.get::<BoundingBox>(entity))
        .map(|(pos, bb)| (pos.x + bb.width / 2.0, pos.y + bb.height / 2.0));

    let remaining = match world.get_mut::<Health>(entity) {
        Some(mut health) => {
            health.current = (health.current - amount).max(0.0);
            health.current
        }
        None => return false,
    };
    if let Some(mut hit_flash) = world.get_mut::<HitFlash>(entity) {
        hit_flash.0 = flash;
    }
    if let Some(mut aggro) = world.get_mut::<Aggro>(entity) {
        aggro.0 = true;
    }
    if let Some((kx, ky)) = knockback {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.x = kx;
            if ky != 0.0 {
                vel.y = ky;
            }
        }
    }
    events.push(GameEvent::MobHurt {
        id,
        damage: amount,
        remaining,
    });
    if remaining > 0.0 {
        return false;
    }

    world.entity_mut(entity).insert(Dead);
    let def = kind.definition();
    {
        let mut progress = world.resource_mut::<PlayerProgress>();
        progress.xp += def.xp_drop;
        progress.kills += 1;
        if source == DamageSource::Arrow {
            progress.bow_kills += 1;
        }
    }
    if rng.gen_bool(MATERIAL_DROP_CHANCE) {
        let drop = if rng.gen_bool(0.5) {
            tile_id::STONE
        } else {
            tile_id::COAL
        };
        store.grant_one(drop);
        events.push(GameEvent::ItemGranted { item: drop });
    }
    if kind == MobKind::Skeleton && rng.gen_bool(SKELETON_ARROW_DROP_CHANCE) {
        store.grant_one(item_id::ARROW);
        events.push(GameEvent::ItemGranted {
            item: item_id::ARROW,
        });
    }
    debug!(id, kind = ?kind, "mob died");
    events.push(GameEvent::MobDied {
        id,
        kind,
        xp: def.xp_drop,
    });
    if let Some((cx, cy)) = center {
        events.push(GameEvent::Particles {
            x: cx,
            y: cy,
            kind: ParticleKind::Hit,
            count: 10,
        });
    }
    true
}

/// Apply damage to the player unless an invincibility window is open.
/// Opens a fresh window on a landed hit. Returns remaining health.
pub fn damage_player(
    world: &mut World,
    player: Entity,
    amount: f32,
    knockback: Option<(f32, f32)>,
    events: &mut Vec<GameEvent>,
) -> f32 {
    let current = world
        .get::<Health>(player)
        .map(|h| h.current)
        .unwrap_or(0.0);
    let invincible = world
        .get::<Invincibility>(player)
        .map(|i| i.0 > 0)
        .unwrap_or(true);
    if invincible {
        return current;
    }

    let remaining = match world.get_mut::<Health>(player) {
        Some(mut health) => {
            health.current = (health.current - amount).max(0.0);
            health.current
        }
        None => return current,
    };
    if let Some(mut inv) = world.get_mut::<Invincibility>(player) {
        inv.0 = HURT_INVINCIBILITY;
    }
    if let Some((kx, ky)) = knockback {
        if let Some(mut vel) = world.get_mut::<Velocity>(player) {
            vel.x = kx;
            vel.y = ky;
        }
    }
    events.push(GameEvent::PlayerHurt {
        damage: amount,
        remaining,
    });
    remaining
}
