//! Player constants and the per-frame player movement update.

use bevy_ecs::prelude::*;

use bw_rs_world::grid::TileGrid;
use bw_rs_world::physics::Body;

use crate::components::*;
use crate::input::FrameInput;

pub const PLAYER_WIDTH: f32 = 22.0;
pub const PLAYER_HEIGHT: f32 = 36.0;
pub const PLAYER_MAX_HP: f32 = 20.0;

/// Horizontal walk speed (units/frame).
pub const WALK_SPEED: f32 = 3.8;

/// Upward jump impulse.
pub const JUMP_SPEED: f32 = 11.0;

/// Terminal fall speed.
pub const TERMINAL_FALL: f32 = 20.0;

/// Horizontal damping while no direction is held.
const GROUND_FRICTION: f32 = 0.75;

/// Invincibility frames granted on respawn.
pub const RESPAWN_INVINCIBILITY: u32 = 60;

/// Spawn the player entity two tiles above `(x, y)`s surface position.
pub fn spawn_player(world: &mut World, id: u64, x: f32, y: f32) -> Entity {
    world
        .spawn((
            EntityId(id),
            Position { x, y },
            Velocity { x: 0.0, y: 0.0 },
            BoundingBox {
                width: PLAYER_WIDTH,
                height: PLAYER_HEIGHT,
            },
            Health {
                current: PLAYER_MAX_HP,
                max: PLAYER_MAX_HP,
            },
            OnGround(false),
            Facing(1.0),
            Invincibility(0),
            MeleeCooldown(0),
            BowCooldown(0),
            Player,
        ))
        .id()
}

/// Apply movement intents, integrate gravity, resolve collisions, and
/// count down the player's timers.
pub fn system_player_update(world: &mut World, grid: &TileGrid, input: &FrameInput) {
    let entity = {
        let mut q = world.query_filtered::<Entity, With<Player>>();
        q.iter(world).next()
    };
    let Some(entity) = entity else {
        return;
    };

    let dir = input.move_dir.sign();
    if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
        if dir != 0.0 {
            vel.x = dir * WALK_SPEED;
        } else {
            vel.x *= GROUND_FRICTION;
        }
    }
    if dir != 0.0 {
        if let Some(mut facing) = world.get_mut::<Facing>(entity) {
            facing.0 = dir;
        }
    }

    let grounded = world.get::<OnGround>(entity).map(|g| g.0).unwrap_or(false);
    if input.jump_held && grounded {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.y = -JUMP_SPEED;
        }
    }

    let state = world
        .get::<Position>(entity)
        .zip(world.get::<Velocity>(entity))
        .zip(world.get::<BoundingBox>(entity))
        .map(|((pos, vel), bb)| (*pos, *vel, *bb));
    if let Some((pos, vel, bb)) = state {
        let mut body = Body {
            x: pos.x,
            y: pos.y,
            w: bb.width,
            h: bb.height,
            vx: vel.x,
            vy: vel.y,
            grounded,
        };
        body.apply_gravity(TERMINAL_FALL);
        body.step(grid);

        if let Some(mut pos) = world.get_mut::<Position>(entity) {
            pos.x = body.x;
            pos.y = body.y;
        }
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.x = body.vx;
            vel.y = body.vy;
        }
        if let Some(mut on_ground) = world.get_mut::<OnGround>(entity) {
            on_ground.0 = body.grounded;
        }
    }

    if let Some(mut timer) = world.get_mut::<Invincibility>(entity) {
        timer.0 = timer.0.saturating_sub(1);
    }
    if let Some(mut timer) = world.get_mut::<MeleeCooldown>(entity) {
        timer.0 = timer.0.saturating_sub(1);
    }
    if let Some(mut timer) = world.get_mut::<BowCooldown>(entity) {
        timer.0 = timer.0.saturating_sub(1);
    }
}
