//! Per-mob decision logic: aggro with hysteresis, pursuit and kiting,
//! jump heuristics, ranged fire, idle wander, and contact damage.

use bevy_ecs::prelude::*;
use rand::Rng;

use bw_rs_world::grid::TileGrid;
use bw_rs_world::physics::{Body, TILE_SIZE};

use crate::combat::{self, contact_threshold, CONTACT_KNOCKBACK};
use crate::components::*;
use crate::game_world::GameEvent;
use crate::mob_registry::MobKind;
use crate::projectile::{mob_arrow_config, Arrow};

/// Terminal fall speed for mobs.
pub const TERMINAL_FALL: f32 = 18.0;

/// Aggro releases at this multiple of the trigger range, so a mob at the
/// boundary does not flicker.
pub const AGGRO_RELEASE_FACTOR: f32 = 1.5;

/// Ranged mobs fire only inside this band (tiles).
pub const RANGED_MIN_RANGE: f32 = 4.0;
pub const RANGED_MAX_RANGE: f32 = 15.0;

/// Inside this distance (tiles) even a ranged mob closes on foot.
pub const MELEE_PURSUIT_RANGE: f32 = 5.0;

/// Jump impulse while chasing.
const PURSUIT_JUMP: f32 = 9.0;

/// Hop impulse while idling.
const IDLE_HOP: f32 = 7.0;

/// Per-frame idle impulse probabilities.
const WANDER_CHANCE: f64 = 0.005;
const IDLE_HOP_CHANCE: f64 = 0.003;

/// Horizontal damping while not aggroed.
const IDLE_DAMPING: f32 = 0.85;

/// Horizontal damping while a ranged mob holds its distance.
const KITING_DAMPING: f32 = 0.8;

struct MobSnapshot {
    entity: Entity,
    kind: MobKind,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    vx: f32,
    vy: f32,
    grounded: bool,
    facing: f32,
    aggro: bool,
    shoot_timer: u32,
    hit_flash: u32,
}

/// Run one AI frame for every live mob: decide, act, then integrate the
/// mob's body against the grid.
pub fn system_mob_ai(
    world: &mut World,
    grid: &TileGrid,
    arrows: &mut Vec<Arrow>,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let player = {
        let mut q = world
            .query_filtered::<(Entity, &Position, &BoundingBox, &Invincibility), With<Player>>();
        q.iter(world).next().map(|(e, pos, bb, inv)| {
            (
                e,
                pos.x + bb.width / 2.0,
                pos.y + bb.height / 2.0,
                bb.width,
                inv.0 > 0,
            )
        })
    };
    let Some((player_entity, px, py, player_w, mut player_invincible)) = player else {
        return;
    };

    let snapshots: Vec<MobSnapshot> = {
        let mut q = world.query_filtered::<(
            Entity,
            &MobKind,
            &Position,
            &Velocity,
            &BoundingBox,
            &OnGround,
            &Facing,
            &Aggro,
            &ShootTimer,
            &HitFlash,
        ), (With<Mob>, Without<Dead>)>();
        q.iter(world)
            .map(
                |(entity, kind, pos, vel, bb, on_ground, facing, aggro, shoot, flash)| {
                    MobSnapshot {
                        entity,
                        kind: *kind,
                        x: pos.x,
                        y: pos.y,
                        w: bb.width,
                        h: bb.height,
                        vx: vel.x,
                        vy: vel.y,
                        grounded: on_ground.0,
                        facing: facing.0,
                        aggro: aggro.0,
                        shoot_timer: shoot.0,
                        hit_flash: flash.0,
                    }
                },
            )
            .collect()
    };

    for snap in snapshots {
        let def = snap.kind.definition();
        let mx = snap.x + snap.w / 2.0;
        let my = snap.y + snap.h / 2.0;
        let dist_x = mx - px;
        let dist_y = my - py;
        let dist = (dist_x * dist_x + dist_y * dist_y).sqrt();

        let mut aggro = snap.aggro;
        if dist < def.aggro_range * TILE_SIZE {
            aggro = true;
        }
        if dist > def.aggro_range * TILE_SIZE * AGGRO_RELEASE_FACTOR {
            aggro = false;
        }

        let mut vx = snap.vx;
        let mut vy = snap.vy;
        let mut facing = snap.facing;
        let mut shoot_timer = snap.shoot_timer;

        if aggro {
            let dir = if dist_x > 0.0 { -1.0 } else { 1.0 };
            facing = dir;

            if def.ranged
                && shoot_timer == 0
                && dist < RANGED_MAX_RANGE * TILE_SIZE
                && dist > RANGED_MIN_RANGE * TILE_SIZE
            {
                shoot_timer = def.shoot_cooldown;
                arrows.push(Arrow::launched(
                    (mx, my),
                    (px, py),
                    &mob_arrow_config(),
                    true,
                ));
                events.push(GameEvent::ArrowFired { from_mob: true });
            }
            shoot_timer = shoot_timer.saturating_sub(1);

            if !def.ranged || dist < MELEE_PURSUIT_RANGE * TILE_SIZE {
                vx = dir * def.movement_speed;
            } else {
                vx *= KITING_DAMPING;
            }

            if snap.grounded && def.jump_chance > 0.0 {
                let probe_x = snap.x + if dir > 0.0 { snap.w } else { -1.0 };
                let ahead = (probe_x / TILE_SIZE).floor() as i32;
                let head = (snap.y / TILE_SIZE).floor() as i32;
                let blocked = !def.climbs_walls && grid.is_solid(ahead, head);
                if rng.gen_bool(def.jump_chance) || blocked {
                    vy = -PURSUIT_JUMP;
                }
            }

            if dist < contact_threshold(snap.w, player_w) && !player_invincible {
                let away = if px - mx > 0.0 { 1.0 } else { -1.0 };
                combat::damage_player(
                    world,
                    player_entity,
                    def.attack_damage,
                    Some((away * CONTACT_KNOCKBACK.0, CONTACT_KNOCKBACK.1)),
                    events,
                );
                player_invincible = true;
            }
        } else {
            if rng.gen_bool(WANDER_CHANCE) {
                vx = (rng.gen::<f32>() - 0.5) * def.movement_speed * 2.0;
            }
            if snap.grounded && rng.gen_bool(IDLE_HOP_CHANCE) {
                vy = -IDLE_HOP;
            }
        }

        let mut body = Body {
            x: snap.x,
            y: snap.y,
            w: snap.w,
            h: snap.h,
            vx,
            vy,
            grounded: snap.grounded,
        };
        body.apply_gravity(TERMINAL_FALL);
        body.step(grid);

        let mut new_vx = body.vx;
        if !aggro {
            new_vx *= IDLE_DAMPING;
        }

        if let Some(mut pos) = world.get_mut::<Position>(snap.entity) {
            pos.x = body.x;
            pos.y = body.y;
        }
        if let Some(mut vel) = world.get_mut::<Velocity>(snap.entity) {
            vel.x = new_vx;
            vel.y = body.vy;
        }
        if let Some(mut on_ground) = world.get_mut::<OnGround>(snap.entity) {
            on_ground.0 = body.grounded;
        }
        if let Some(mut facing_c) = world.get_mut::<Facing>(snap.entity) {
            facing_c.0 = facing;
        }
        if let Some(mut aggro_c) = world.get_mut::<Aggro>(snap.entity) {
            aggro_c.0 = aggro;
        }
        if let Some(mut shoot_c) = world.get_mut::<ShootTimer>(snap.entity) {
            shoot_c.0 = shoot_timer;
        }
        if let Some(mut flash) = world.get_mut::<HitFlash>(snap.entity) {
            flash.0 = snap.hit_flash.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_rs_world::flat_generator::generate_flat;
    use bw_rs_world::tile_registry::tile_id;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn_test_player(world: &mut World, x: f32, y: f32) -> Entity {
        world
            .spawn((
                EntityId(0),
                Position { x, y },
                Velocity { x: 0.0, y: 0.0 },
                BoundingBox {
                    width: 22.0,
                    height: 36.0,
                },
                Health {
                    current: 20.0,
                    max: 20.0,
                },
                Invincibility(0),
                Player,
            ))
            .id()
    }

    fn spawn_test_mob(world: &mut World, kind: MobKind, x: f32, y: f32) -> Entity {
        let def = kind.definition();
        world
            .spawn((
                EntityId(1),
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
            ))
            .id()
    }

    fn run_ai(world: &mut World, grid: &TileGrid) -> Vec<Arrow> {
        let mut arrows = Vec::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut events = Vec::new();
        system_mob_ai(world, grid, &mut arrows, &mut rng, &mut events);
        arrows
    }

    #[test]
    fn mob_aggros_inside_trigger_range() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        spawn_test_player(&mut world, 400.0, 364.0);
        // Zombie two tiles away, well inside its 12-tile trigger range.
        let mob = spawn_test_mob(&mut world, MobKind::Zombie, 480.0, 368.0);

        run_ai(&mut world, &grid);
        assert!(world.get::<Aggro>(mob).unwrap().0);
        // Facing the player, to the left.
        assert_eq!(world.get::<Facing>(mob).unwrap().0, -1.0);
    }

    #[test]
    fn hysteresis_band_preserves_either_state() {
        let grid = generate_flat(40, 20, 10);
        // Zombie trigger is 480, release is 720; 600 sits in the band.
        let mut world = World::new();
        spawn_test_player(&mut world, 400.0, 364.0);
        let mob = spawn_test_mob(&mut world, MobKind::Zombie, 1001.0, 368.0);

        run_ai(&mut world, &grid);
        assert!(!world.get::<Aggro>(mob).unwrap().0);

        world.get_mut::<Aggro>(mob).unwrap().0 = true;
        run_ai(&mut world, &grid);
        assert!(world.get::<Aggro>(mob).unwrap().0);
    }

    #[test]
    fn aggro_releases_beyond_half_again_the_range() {
        let grid = generate_flat(60, 20, 10);
        let mut world = World::new();
        spawn_test_player(&mut world, 100.0, 364.0);
        // 800 px away: past the zombie's 720 release distance.
        let mob = spawn_test_mob(&mut world, MobKind::Zombie, 900.0, 368.0);
        world.get_mut::<Aggro>(mob).unwrap().0 = true;

        run_ai(&mut world, &grid);
        assert!(!world.get::<Aggro>(mob).unwrap().0);
    }

    #[test]
    fn contact_hurts_and_knocks_back_the_player() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        let player = spawn_test_player(&mut world, 400.0, 364.0);
        // Overlapping the player: well inside the contact threshold.
        spawn_test_mob(&mut world, MobKind::Zombie, 405.0, 368.0);

        run_ai(&mut world, &grid);
        let health = world.get::<Health>(player).unwrap();
        assert_eq!(health.current, 18.0);
        assert_eq!(world.get::<Invincibility>(player).unwrap().0, 40);
        // Knocked away from the mob, which sits to the right.
        let vel = world.get::<Velocity>(player).unwrap();
        assert_eq!(vel.x, -CONTACT_KNOCKBACK.0);
        assert_eq!(vel.y, CONTACT_KNOCKBACK.1);
    }

    #[test]
    fn contact_respects_invincibility() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        let player = spawn_test_player(&mut world, 400.0, 364.0);
        world.get_mut::<Invincibility>(player).unwrap().0 = 30;
        spawn_test_mob(&mut world, MobKind::Zombie, 405.0, 368.0);

        run_ai(&mut world, &grid);
        assert_eq!(world.get::<Health>(player).unwrap().current, 20.0);
    }

    #[test]
    fn skeleton_kites_instead_of_closing() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        spawn_test_player(&mut world, 400.0, 364.0);
        // Eight tiles out: aggro, beyond melee pursuit, cooldown not up.
        let mob = spawn_test_mob(&mut world, MobKind::Skeleton, 720.0, 368.0);
        world.get_mut::<Velocity>(mob).unwrap().x = 5.0;

        run_ai(&mut world, &grid);
        let vel = world.get::<Velocity>(mob).unwrap();
        assert_eq!(vel.x, 5.0 * 0.8);
    }

    #[test]
    fn skeleton_fires_once_cooldown_elapses() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        spawn_test_player(&mut world, 400.0, 364.0);
        let mob = spawn_test_mob(&mut world, MobKind::Skeleton, 720.0, 368.0);
        world.get_mut::<ShootTimer>(mob).unwrap().0 = 0;

        let arrows = run_ai(&mut world, &grid);
        assert_eq!(arrows.len(), 1);
        assert!(arrows[0].from_mob);
        // Aimed at the player, to the left.
        assert!(arrows[0].vx < 0.0);
        // The cooldown re-arms (less the same frame's count-down).
        assert_eq!(
            world.get::<ShootTimer>(mob).unwrap().0,
            MobKind::Skeleton.definition().shoot_cooldown - 1
        );
    }

    #[test]
    fn skeleton_holds_fire_outside_the_band() {
        let grid = generate_flat(60, 20, 10);
        let mut world = World::new();
        spawn_test_player(&mut world, 100.0, 364.0);
        // 15.5 tiles out: aggro (range 16) but past the 15-tile band edge.
        let mob = spawn_test_mob(&mut world, MobKind::Skeleton, 100.0 + 15.5 * TILE_SIZE, 368.0);
        world.get_mut::<ShootTimer>(mob).unwrap().0 = 0;

        let arrows = run_ai(&mut world, &grid);
        assert!(arrows.is_empty());
    }

    #[test]
    fn blocked_mob_jumps_over_the_obstacle() {
        let mut grid = generate_flat(40, 20, 10);
        // Wall directly ahead of the mob at head height.
        grid.set_tile(3, 8, tile_id::STONE);
        grid.set_tile(3, 9, tile_id::STONE);
        let mut world = World::new();
        spawn_test_player(&mut world, 300.0, 364.0);
        let mob = spawn_test_mob(&mut world, MobKind::Zombie, 100.0, 368.0);
        world.get_mut::<OnGround>(mob).unwrap().0 = true;

        run_ai(&mut world, &grid);
        assert!(world.get::<Velocity>(mob).unwrap().y < 0.0);
    }

    #[test]
    fn dead_mobs_are_skipped() {
        let grid = generate_flat(40, 20, 10);
        let mut world = World::new();
        let player = spawn_test_player(&mut world, 400.0, 364.0);
        let mob = spawn_test_mob(&mut world, MobKind::Zombie, 405.0, 368.0);
        world.entity_mut(mob).insert(Dead);

        run_ai(&mut world, &grid);
        // No contact damage and no movement from a corpse.
        assert_eq!(world.get::<Health>(player).unwrap().current, 20.0);
        assert_eq!(world.get::<Position>(mob).unwrap().x, 405.0);
    }
}
