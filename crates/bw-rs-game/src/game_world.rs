//! The per-frame orchestrator: ECS world, entity management, the fixed
//! update order, and the event bus read by the embedding driver.

use std::sync::atomic::{AtomicU64, Ordering};

use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use bw_rs_world::grid::TileGrid;
use bw_rs_world::item_registry::ItemId;
use bw_rs_world::physics::TILE_SIZE;
use bw_rs_world::tile_registry::{tile_id, TileId};

use crate::ai;
use crate::combat;
use crate::components::*;
use crate::input::FrameInput;
use crate::inventory::SlotInventory;
use crate::mining::{self, MiningOperation};
use crate::mob_registry::{self, MobKind};
use crate::parkour::{self, ParkourGoal};
use crate::player;
use crate::projectile::{self, Arrow};
use crate::quest::QuestLog;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Outgoing events queued during a frame for the driver to drain.
#[derive(Resource, Default)]
pub struct OutgoingEvents {
    pub events: Vec<GameEvent>,
}

/// Global frame counter (incremented once per `step`).
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Entity ID allocator (shared by the player and mobs).
#[derive(Resource)]
pub struct EntityIdAllocator {
    next: AtomicU64,
}

impl EntityIdAllocator {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Allocate the next unique entity ID.
    pub fn allocate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// The player's lifetime counters, read by quests and the HUD.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    pub xp: u32,
    pub kills: u32,
    pub bow_kills: u32,
    /// Stone blocks mined.
    pub mines: u32,
    pub max_parkour_tier: u32,
}

// ---------------------------------------------------------------------------
// Game events (simulation -> driver)
// ---------------------------------------------------------------------------

/// Cosmetic particle burst classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Dust of the named tile while breaking or on break.
    BlockDust(TileId),
    /// An arrow struck the terrain.
    ArrowImpact,
    /// An entity was hurt or died.
    Hit,
    /// A parkour goal was collected.
    GoalBurst,
}

/// Events produced by one frame, consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    MobSpawned {
        id: u64,
        kind: MobKind,
        x: f32,
        y: f32,
    },
    MobHurt {
        id: u64,
        damage: f32,
        remaining: f32,
    },
    MobDied {
        id: u64,
        kind: MobKind,
        xp: u32,
    },
    PlayerHurt {
        damage: f32,
        remaining: f32,
    },
    PlayerDied,
    PlayerRespawned,
    ArrowFired {
        from_mob: bool,
    },
    BlockBroken {
        x: i32,
        y: i32,
        tile: TileId,
    },
    BlockPlaced {
        x: i32,
        y: i32,
        tile: TileId,
    },
    ItemGranted {
        item: ItemId,
    },
    QuestCompleted {
        id: String,
        xp_reward: u32,
    },
    GoalReached {
        tier: u32,
        xp: u32,
    },
    Particles {
        x: f32,
        y: f32,
        kind: ParticleKind,
        count: u32,
    },
    Message(String),
}

/// Snapshot of one mob for the presentation layer.
#[derive(Debug, Clone)]
pub struct MobView {
    pub id: u64,
    pub kind: MobKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub facing: f32,
    pub aggro: bool,
    pub hit_flash: u32,
}

// ---------------------------------------------------------------------------
// GameWorld
// ---------------------------------------------------------------------------

/// One running simulation: the ECS world plus the grid, projectiles,
/// mining state, quests, goals, and inventory. An external fixed-timestep
/// driver calls [`GameWorld::step`] once per frame.
pub struct GameWorld {
    pub world: World,
    grid: TileGrid,
    goals: Vec<ParkourGoal>,
    arrows: Vec<Arrow>,
    mining: Option<MiningOperation>,
    quests: QuestLog,
    inventory: SlotInventory,
    rng: StdRng,
    defeated: bool,
    spawn_x: i32,
    player: Entity,
}

impl GameWorld {
    /// Create a simulation from a generated world snapshot and its goal
    /// markers. The player spawns above the surface of the centre column.
    pub fn new(grid: TileGrid, goals: Vec<ParkourGoal>, seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(EntityIdAllocator::new(1));
        world.insert_resource(PlayerProgress::default());

        let spawn_x = (grid.width() / 2) as i32;
        let surface = surface_row(&grid, spawn_x).unwrap_or(grid.height() as i32);
        let id = world.resource::<EntityIdAllocator>().allocate();
        let player = player::spawn_player(
            &mut world,
            id,
            spawn_x as f32 * TILE_SIZE,
            (surface - 2) as f32 * TILE_SIZE,
        );

        Self {
            world,
            grid,
            goals,
            arrows: Vec::new(),
            mining: None,
            quests: QuestLog::from_embedded(),
            inventory: SlotInventory::starting_loadout(),
            rng: StdRng::seed_from_u64(seed),
            defeated: false,
            spawn_x,
            player,
        }
    }

    /// Run one frame in fixed order: player, mobs, projectiles, cleanup.
    /// A defeated simulation is frozen until [`GameWorld::respawn`].
    pub fn step(&mut self, input: &FrameInput) {
        if self.defeated {
            return;
        }
        self.world.resource_mut::<TickCounter>().0 += 1;
        let mut events = Vec::new();

        player::system_player_update(&mut self.world, &self.grid, input);
        if input.melee_triggered {
            combat::player_melee_attack(
                &mut self.world,
                &mut self.rng,
                &mut self.inventory,
                &mut self.quests,
                &mut events,
            );
        }
        if input.shoot_triggered {
            projectile::try_shoot(
                &mut self.world,
                &mut self.inventory,
                &mut self.arrows,
                (input.aim_x, input.aim_y),
                &mut events,
            );
        }
        mining::system_mining(
            &mut self.world,
            &mut self.grid,
            &mut self.mining,
            input,
            &mut self.inventory,
            &mut self.quests,
            &mut self.rng,
            &mut events,
        );
        if input.place_triggered {
            mining::place_block(
                &mut self.world,
                &mut self.grid,
                input,
                &mut self.inventory,
                &mut events,
            );
        }
        parkour::check_goals(
            &mut self.world,
            &mut self.goals,
            &mut self.inventory,
            &mut self.quests,
            &mut events,
        );

        ai::system_mob_ai(
            &mut self.world,
            &self.grid,
            &mut self.arrows,
            &mut self.rng,
            &mut events,
        );
        projectile::system_arrows(
            &mut self.world,
            &self.grid,
            &mut self.arrows,
            &mut self.rng,
            &mut self.inventory,
            &mut self.quests,
            &mut events,
        );

        let hp = self
            .world
            .get::<Health>(self.player)
            .map(|h| h.current)
            .unwrap_or(0.0);
        if hp <= 0.0 {
            self.defeated = true;
            debug!("player defeated");
            events.push(GameEvent::PlayerDied);
        }

        system_cleanup_dead(&mut self.world);
        self.world
            .resource_mut::<OutgoingEvents>()
            .events
            .extend(events);
    }

    /// Bring a defeated player back: full health, spawn-column surface,
    /// a fresh invincibility window, and the simulation unfrozen.
    pub fn respawn(&mut self) {
        if !self.defeated {
            return;
        }
        let surface = surface_row(&self.grid, self.spawn_x).unwrap_or(self.grid.height() as i32);
        if let Some(mut pos) = self.world.get_mut::<Position>(self.player) {
            pos.x = self.spawn_x as f32 * TILE_SIZE;
            pos.y = (surface - 2) as f32 * TILE_SIZE;
        }
        if let Some(mut vel) = self.world.get_mut::<Velocity>(self.player) {
            vel.x = 0.0;
            vel.y = 0.0;
        }
        if let Some(mut health) = self.world.get_mut::<Health>(self.player) {
            health.current = health.max;
        }
        if let Some(mut inv) = self.world.get_mut::<Invincibility>(self.player) {
            inv.0 = player::RESPAWN_INVINCIBILITY;
        }
        if let Some(mut on_ground) = self.world.get_mut::<OnGround>(self.player) {
            on_ground.0 = false;
        }
        self.defeated = false;
        self.world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::PlayerRespawned);
    }

    /// Spawn a mob on the surface of the given column. Returns its ID,
    /// or `None` when the column has no ground at all.
    pub fn spawn_mob(&mut self, kind: MobKind, tile_x: i32) -> Option<u64> {
        let surface = surface_row(&self.grid, tile_x)?;
        let def = kind.definition();
        let id = self.world.resource::<EntityIdAllocator>().allocate();
        let x = tile_x as f32 * TILE_SIZE;
        let y = (surface - 2) as f32 * TILE_SIZE;

        self.world.spawn((
            EntityId(id),
            kind,
            Position { x, y },
            Velocity { x: 0.0, y: 0.0 },
            BoundingBox {
                width: def.width,
                height: def.height,
            },
            Health {
                current: def.max_health,
                max: def.max_health,
            },
            OnGround(false),
            Facing(1.0),
            Aggro(false),
            HitFlash(0),
            ShootTimer(def.shoot_cooldown),
            Mob,
        ));
        self.world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::MobSpawned { id, kind, x, y });
        Some(id)
    }

    /// Scatter the default mob population across random surface columns.
    pub fn populate_mobs(&mut self) {
        for &(kind, count) in mob_registry::default_population() {
            for _ in 0..count {
                let column = self.rng.gen_range(0..self.grid.width()) as i32;
                self.spawn_mob(kind, column);
            }
        }
    }

    /// Drain all pending outgoing events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.resource_mut::<OutgoingEvents>().events)
    }

    /// Frames stepped so far.
    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickCounter>().0
    }

    /// Whether the player is down and the simulation frozen.
    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn goals(&self) -> &[ParkourGoal] {
        &self.goals
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// The in-progress block break, if any.
    pub fn mining(&self) -> Option<MiningOperation> {
        self.mining
    }

    pub fn quests(&self) -> &QuestLog {
        &self.quests
    }

    pub fn inventory(&self) -> &SlotInventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut SlotInventory {
        &mut self.inventory
    }

    pub fn progress(&self) -> PlayerProgress {
        *self.world.resource::<PlayerProgress>()
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    /// Player `(current, max)` health.
    pub fn player_health(&self) -> (f32, f32) {
        self.world
            .get::<Health>(self.player)
            .map(|h| (h.current, h.max))
            .unwrap_or((0.0, 0.0))
    }

    /// Player top-left position.
    pub fn player_position(&self) -> (f32, f32) {
        self.world
            .get::<Position>(self.player)
            .map(|p| (p.x, p.y))
            .unwrap_or((0.0, 0.0))
    }

    /// Snapshots of all live mobs for the presentation layer.
    pub fn mobs(&mut self) -> Vec<MobView> {
        let mut result = Vec::new();
        let mut query = self.world.query_filtered::<(
            &EntityId,
            &MobKind,
            &Position,
            &BoundingBox,
            &Health,
            &Facing,
            &Aggro,
            &HitFlash,
        ), (With<Mob>, Without<Dead>)>();
        for (eid, kind, pos, bb, health, facing, aggro, flash) in query.iter(&self.world) {
            result.push(MobView {
                id: eid.0,
                kind: *kind,
                x: pos.x,
                y: pos.y,
                width: bb.width,
                height: bb.height,
                health: health.current,
                max_health: health.max,
                facing: facing.0,
                aggro: aggro.0,
                hit_flash: flash.0,
            });
        }
        result
    }
}

/// First row with any tile in it, scanning down the column.
fn surface_row(grid: &TileGrid, x: i32) -> Option<i32> {
    (0..grid.height() as i32).find(|&y| grid.tile_at(x, y) != tile_id::AIR)
}

/// Remove entities that died this frame, after their events went out.
fn system_cleanup_dead(world: &mut World) {
    let dead: Vec<Entity> = world
        .query_filtered::<Entity, With<Dead>>()
        .iter(world)
        .collect();
    for entity in dead {
        world.despawn(entity);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
