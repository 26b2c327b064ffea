//! ECS components shared by the player and mobs.

use bevy_ecs::prelude::*;

/// Stable identity for an entity, used in outgoing events.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub u64);

/// Top-left corner of the bounding box, in world units.
#[derive(Component, Debug, Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Velocity in world units per frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Bounding box dimensions.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

/// Health points, clamped to `[0, max]`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Whether the entity landed on solid ground last frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct OnGround(pub bool);

/// Horizontal facing direction: `1.0` right, `-1.0` left.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub f32);

/// Whether the mob has noticed the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct Aggro(pub bool);

/// Frames of hit feedback remaining (presentation reads this).
#[derive(Component, Debug, Clone, Copy)]
pub struct HitFlash(pub u32);

/// Frames until a ranged mob may shoot again. Counts down only while
/// the mob is aggroed.
#[derive(Component, Debug, Clone, Copy)]
pub struct ShootTimer(pub u32);

/// Frames of damage immunity remaining after the player was hurt.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Invincibility(pub u32);

/// Frames until the player may melee again.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MeleeCooldown(pub u32);

/// Frames until the player may shoot again.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BowCooldown(pub u32);

/// Marker: this entity is a mob.
#[derive(Component, Debug)]
pub struct Mob;

/// Marker: this entity is the player.
#[derive(Component, Debug)]
pub struct Player;

/// Marker: this entity died this frame (pending cleanup).
#[derive(Component, Debug)]
pub struct Dead;
