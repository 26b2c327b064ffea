//! Arrow ballistics: launch, per-frame flight, and impact resolution.

use bevy_ecs::prelude::*;
use rand::Rng;

use bw_rs_world::grid::TileGrid;
use bw_rs_world::item_registry::item_id;
use bw_rs_world::physics::TILE_SIZE;

use crate::combat::{self, DamageSource};
use crate::components::*;
use crate::game_world::{GameEvent, ParticleKind, PlayerProgress};
use crate::inventory::ItemStore;
use crate::quest::QuestLog;

/// Frames between player bow shots.
pub const BOW_COOLDOWN_FRAMES: u32 = 25;

/// Downward acceleration on arrows per frame.
pub const ARROW_GRAVITY: f32 = 0.25;

/// Hit feedback frames from an arrow hit.
pub const ARROW_HIT_FLASH: u32 = 8;

/// Horizontal knockback on an arrow hit (signed by arrow direction).
pub const ARROW_KNOCKBACK: f32 = 2.0;

/// The bow's arrow leaves slightly above the player's centre.
const SHOT_ORIGIN_LIFT: f32 = 4.0;

/// Configuration for one projectile class.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    /// Launch speed (units/frame).
    pub speed: f32,
    /// Damage on an entity hit.
    pub damage: f32,
    /// Frames before the projectile expires in flight.
    pub lifetime: u32,
}

/// Configuration for arrows fired by the player.
pub fn player_arrow_config() -> ProjectileConfig {
    ProjectileConfig {
        speed: 14.0,
        damage: 3.0,
        lifetime: 100,
    }
}

/// Configuration for arrows fired by skeletons.
pub fn mob_arrow_config() -> ProjectileConfig {
    ProjectileConfig {
        speed: 7.0,
        damage: 2.0,
        lifetime: 80,
    }
}

/// A live arrow.
#[derive(Debug, Clone, Copy)]
pub struct Arrow {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames of flight remaining.
    pub life: u32,
    /// Mob arrows hurt the player; player arrows hurt mobs.
    pub from_mob: bool,
}

impl Arrow {
    /// Launch toward a target point at the config's speed.
    pub fn launched(
        origin: (f32, f32),
        target: (f32, f32),
        config: &ProjectileConfig,
        from_mob: bool,
    ) -> Self {
        let dx = target.0 - origin.0;
        let dy = target.1 - origin.1;
        let mag = (dx * dx + dy * dy).sqrt().max(1.0);
        Self {
            x: origin.0,
            y: origin.1,
            vx: dx / mag * config.speed,
            vy: dy / mag * config.speed,
            life: config.lifetime,
            from_mob,
        }
    }
}

/// Why a shot request did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Fired,
    OnCooldown,
    NoAmmo,
}

/// Fire the player's bow toward the aim point, consuming one arrow from
/// the store. Declines with a user-facing message when no arrows remain.
pub fn try_shoot(
    world: &mut World,
    store: &mut dyn ItemStore,
    arrows: &mut Vec<Arrow>,
    aim: (f32, f32),
    events: &mut Vec<GameEvent>,
) -> ShotOutcome {
    let player = {
        let mut q = world.query_filtered::<(Entity, &Position, &BoundingBox), With<Player>>();
        q.iter(world)
            .next()
            .map(|(e, pos, bb)| (e, pos.x + bb.width / 2.0, pos.y + bb.height / 2.0))
    };
    let Some((entity, cx, cy)) = player else {
        return ShotOutcome::OnCooldown;
    };

    let on_cooldown = world
        .get::<BowCooldown>(entity)
        .map(|c| c.0 > 0)
        .unwrap_or(false);
    if on_cooldown {
        return ShotOutcome::OnCooldown;
    }
    if !store.consume_one(item_id::ARROW) {
        events.push(GameEvent::Message("No arrows!".to_string()));
        return ShotOutcome::NoAmmo;
    }

    let origin = (cx, cy - SHOT_ORIGIN_LIFT);
    arrows.push(Arrow::launched(origin, aim, &player_arrow_config(), false));
    if let Some(mut cooldown) = world.get_mut::<BowCooldown>(entity) {
        cooldown.0 = BOW_COOLDOWN_FRAMES;
    }
    events.push(GameEvent::ArrowFired { from_mob: false });
    ShotOutcome::Fired
}

/// Advance every arrow one frame and resolve impacts. Resolution order
/// per arrow: solid grid cell, then entity hit, then expiry — first
/// match wins and retires the arrow.
pub fn system_arrows(
    world: &mut World,
    grid: &TileGrid,
    arrows: &mut Vec<Arrow>,
    rng: &mut impl Rng,
    store: &mut dyn ItemStore,
    quests: &mut QuestLog,
    events: &mut Vec<GameEvent>,
) {
    let player = {
        let mut q = world.query_filtered::<(Entity, &Position, &BoundingBox), With<Player>>();
        q.iter(world)
            .next()
            .map(|(e, pos, bb)| (e, pos.x, pos.y, bb.width, bb.height))
    };
    let mobs: Vec<(Entity, f32, f32, f32, f32)> = {
        let mut q = world
            .query_filtered::<(Entity, &Position, &BoundingBox), (With<Mob>, Without<Dead>)>();
        q.iter(world)
            .map(|(e, pos, bb)| (e, pos.x, pos.y, bb.width, bb.height))
            .collect()
    };

    let mut killed_any = false;
    let mut i = 0;
    while i < arrows.len() {
        let mut arrow = arrows[i];
        arrow.x += arrow.vx;
        arrow.y += arrow.vy;
        arrow.vy += ARROW_GRAVITY;
        arrow.life = arrow.life.saturating_sub(1);
        arrows[i] = arrow;

        let tx = (arrow.x / TILE_SIZE).floor() as i32;
        let ty = (arrow.y / TILE_SIZE).floor() as i32;
        if grid.is_solid(tx, ty) {
            events.push(GameEvent::Particles {
                x: arrow.x,
                y: arrow.y,
                kind: ParticleKind::ArrowImpact,
                count: 4,
            });
            arrows.remove(i);
            continue;
        }

        let mut retired = false;
        if !arrow.from_mob {
            for &(entity, mx, my, mw, mh) in &mobs {
                if arrow.x > mx && arrow.x < mx + mw && arrow.y > my && arrow.y < my + mh {
                    // A corpse from an earlier arrow this frame is skipped
                    // inside damage_mob; the arrow flies on.
                    if world.get::<Dead>(entity).is_some() {
                        continue;
                    }
                    let kx = if arrow.vx > 0.0 {
                        ARROW_KNOCKBACK
                    } else {
                        -ARROW_KNOCKBACK
                    };
                    killed_any |= combat::damage_mob(
                        world,
                        entity,
                        player_arrow_config().damage,
                        Some((kx, 0.0)),
                        ARROW_HIT_FLASH,
                        DamageSource::Arrow,
                        rng,
                        store,
                        events,
                    );
                    events.push(GameEvent::Particles {
                        x: arrow.x,
                        y: arrow.y,
                        kind: ParticleKind::Hit,
                        count: 5,
                    });
                    retired = true;
                    break;
                }
            }
        } else if let Some((entity, px, py, pw, ph)) = player {
            if arrow.x > px && arrow.x < px + pw && arrow.y > py && arrow.y < py + ph {
                let invincible = world
                    .get::<Invincibility>(entity)
                    .map(|inv| inv.0 > 0)
                    .unwrap_or(true);
                if !invincible {
                    combat::damage_player(
                        world,
                        entity,
                        mob_arrow_config().damage,
                        None,
                        events,
                    );
                    retired = true;
                }
            }
        }
        if retired || arrow.life == 0 {
            arrows.remove(i);
            continue;
        }
        i += 1;
    }

    if killed_any {
        let mut progress = world.resource_mut::<PlayerProgress>();
        quests.evaluate(&mut progress, store, events);
    }
}
