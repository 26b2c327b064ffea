//! Mob type definitions.
//!
//! Each mob kind carries a static parameter row with its stats and hitbox
//! dimensions; AI reads these rather than storing per-mob copies.

use bevy_ecs::prelude::*;

/// The closed set of mob types. Doubles as the ECS tag component.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobKind {
    Zombie,
    Skeleton,
    Spider,
}

/// Definition of a mob type.
#[derive(Debug, Clone)]
pub struct MobDefinition {
    /// Display name, e.g. `"Zombie"`.
    pub display_name: &'static str,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    pub max_health: f32,
    /// Contact damage dealt to the player.
    pub attack_damage: f32,
    /// Horizontal pursuit speed (units/frame).
    pub movement_speed: f32,
    /// Experience granted on death.
    pub xp_drop: u32,
    /// Aggro trigger distance in tiles. Release happens at 1.5x.
    pub aggro_range: f32,
    /// Per-frame probability of a jump while grounded and aggroed.
    pub jump_chance: f64,
    /// Whether this type shoots arrows instead of closing to melee.
    pub ranged: bool,
    /// Frames between ranged attacks.
    pub shoot_cooldown: u32,
    /// Wall-climbers never need the blocked-path jump.
    pub climbs_walls: bool,
}

static ZOMBIE: MobDefinition = MobDefinition {
    display_name: "Zombie",
    width: 20.0,
    height: 32.0,
    max_health: 10.0,
    attack_damage: 2.0,
    movement_speed: 1.2,
    xp_drop: 5,
    aggro_range: 12.0,
    jump_chance: 0.02,
    ranged: false,
    shoot_cooldown: 0,
    climbs_walls: false,
};

static SKELETON: MobDefinition = MobDefinition {
    display_name: "Skeleton",
    width: 18.0,
    height: 32.0,
    max_health: 7.0,
    attack_damage: 1.0,
    movement_speed: 1.6,
    xp_drop: 8,
    aggro_range: 16.0,
    jump_chance: 0.015,
    ranged: true,
    shoot_cooldown: 120,
    climbs_walls: false,
};

static SPIDER: MobDefinition = MobDefinition {
    display_name: "Spider",
    width: 28.0,
    height: 18.0,
    max_health: 8.0,
    attack_damage: 1.5,
    movement_speed: 2.0,
    xp_drop: 6,
    aggro_range: 14.0,
    jump_chance: 0.04,
    ranged: false,
    shoot_cooldown: 0,
    climbs_walls: true,
};

impl MobKind {
    /// All known mob kinds.
    pub const ALL: [MobKind; 3] = [MobKind::Zombie, MobKind::Skeleton, MobKind::Spider];

    /// The static parameter row for this kind.
    pub fn definition(self) -> &'static MobDefinition {
        match self {
            MobKind::Zombie => &ZOMBIE,
            MobKind::Skeleton => &SKELETON,
            MobKind::Spider => &SPIDER,
        }
    }
}

/// Initial world population: `(kind, count)` pairs.
pub fn default_population() -> &'static [(MobKind, u32)] {
    &[
        (MobKind::Zombie, 18),
        (MobKind::Skeleton, 10),
        (MobKind::Spider, 10),
    ]
}
