//! Per-tank behavior FSM
//!
//! One evaluation per tank per frame:
//! 1. Cooldown accounting (`Cannon::tick`)
//! 2. Health check: `current <= 0` forces Dead (the dying tick never fires)
//! 3. Handler for the current state, which returns the next state
//!
//! Handlers only write tank-local components plus outgoing events, so the
//! whole pass is a single query iteration.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::perception::sense_hostiles;
use crate::ai::{HostileTarget, TankState};
use crate::combat::{Cannon, FireDecision, ProjectileSpawnRequest};
use crate::components::{aim_rotation, Health, NavigationAgent, Rosters, Tank, TankLifecycle, Turret};
use crate::config::{PatrolArea, TankConfig};
use crate::lifecycle::TankDestroyed;
use crate::spatial::SpatialQuery;
use crate::DeterministicRng;

/// Tank-local state one handler works on.
pub(crate) struct TankContext<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub delta: f32,
    pub config: &'a TankConfig,
    pub rosters: &'a Rosters,
    pub target: &'a mut HostileTarget,
    pub turret: &'a mut Turret,
    pub cannon: &'a mut Cannon,
    pub navigation: &'a mut NavigationAgent,
}

/// Read-only view of every tank (hostile positions, liveness).
pub(crate) type TankLookup<'w, 's> = Query<'w, 's, (&'static Transform, &'static Health), With<Tank>>;

/// System: evaluate the FSM for every initialized tank.
pub fn tank_fsm_tick<S: SpatialQuery>(
    time: Res<Time>,
    spatial: Res<S>,
    mut rng: ResMut<DeterministicRng>,
    mut tanks: Query<
        (
            Entity,
            &Tank,
            &Transform,
            &Health,
            &TankConfig,
            &Rosters,
            &mut TankState,
            &mut HostileTarget,
            &mut Turret,
            &mut Cannon,
            &mut NavigationAgent,
            &mut TankLifecycle,
        ),
    >,
    lookup: TankLookup,
    mut projectiles: EventWriter<ProjectileSpawnRequest>,
    mut destroyed: EventWriter<TankDestroyed>,
) {
    let delta = time.delta_secs();

    for (
        entity,
        tank,
        transform,
        health,
        config,
        rosters,
        mut state,
        mut target,
        mut turret,
        mut cannon,
        mut navigation,
        mut lifecycle,
    ) in tanks.iter_mut()
    {
        if !lifecycle.initialized {
            continue;
        }

        cannon.tick(delta);

        let current = if health.is_alive() {
            *state
        } else {
            TankState::Dead
        };

        let mut ctx = TankContext {
            entity,
            position: transform.translation,
            delta,
            config,
            rosters,
            target: &mut *target,
            turret: &mut *turret,
            cannon: &mut *cannon,
            navigation: &mut *navigation,
        };

        let next = match current {
            TankState::Patrol => update_patrol(&mut ctx, &*spatial, &lookup, &mut rng),
            TankState::Chase => update_chase(&mut ctx, &lookup, &mut projectiles),
            TankState::Flee => update_flee(&mut ctx, &lookup, &mut rng),
            // Reserved: no behavior yet
            TankState::Attack | TankState::Evade => current,
            TankState::Dead => {
                if begin_teardown(&mut *lifecycle) {
                    crate::log_info(&format!(
                        "💀 Tank {:?} (squad {}) destroyed at {:?}",
                        entity, tank.squad, transform.translation
                    ));
                    destroyed.write(TankDestroyed {
                        entity,
                        squad: tank.squad,
                        position: transform.translation,
                    });
                }
                TankState::Dead
            }
        };

        if next == TankState::Patrol && target.get().is_some() {
            target.clear();
        }

        if *state != next {
            crate::log(&format!(
                "Tank {:?}: {} → {}",
                entity,
                state.as_str(),
                next.as_str()
            ));
            *state = next;
        }
    }
}

/// Patrol: wander between random waypoints, look for hostiles.
pub(crate) fn update_patrol<S: SpatialQuery>(
    ctx: &mut TankContext,
    spatial: &S,
    lookup: &TankLookup,
    rng: &mut DeterministicRng,
) -> TankState {
    repick_waypoint(ctx, rng);

    let hostiles = ctx.rosters.hostile.iter().filter_map(|&hostile| {
        lookup
            .get(hostile)
            .ok()
            .filter(|(_, health)| health.is_alive())
            .map(|(transform, _)| (hostile, transform.translation))
    });

    let eye = Turret::pivot(ctx.position, ctx.config);
    let sighting = sense_hostiles(spatial, ctx.position, eye, ctx.config.sight_range(), hostiles);
    let Some(hostile) = sighting.target() else {
        return TankState::Patrol;
    };

    crate::log(&format!("👁️ Tank {:?} spotted hostile {:?}", ctx.entity, hostile));
    ctx.target.set(hostile);
    TankState::Chase
}

/// Chase: close in, aim, fire inside the band; back off when too close.
pub(crate) fn update_chase(
    ctx: &mut TankContext,
    lookup: &TankLookup,
    projectiles: &mut EventWriter<ProjectileSpawnRequest>,
) -> TankState {
    let Some((hostile, hostile_position)) = resolve_target(ctx, lookup) else {
        return lose_target(ctx);
    };

    ctx.navigation.set_destination(hostile_position);

    let aim = aim_rotation(ctx.position, hostile_position);
    ctx.turret
        .rotate_towards(aim, ctx.delta * ctx.config.rotation_speed);

    let distance = ctx.position.distance(hostile_position);
    let in_fire_band =
        distance >= ctx.config.min_fire_distance && distance <= ctx.config.max_fire_distance;

    if in_fire_band && ctx.turret.is_aligned(aim) {
        if ctx.cannon.try_fire() == FireDecision::Fire {
            let (position, rotation) = ctx.turret.muzzle_pose(ctx.position, ctx.config);
            crate::log(&format!(
                "🔫 Tank {:?} fires at {:?} (distance {:.1})",
                ctx.entity, hostile, distance
            ));
            projectiles.write(ProjectileSpawnRequest {
                shooter: ctx.entity,
                target: Some(hostile),
                position,
                rotation,
            });
        }
    } else if distance < ctx.config.min_fire_distance {
        ctx.navigation
            .set_speed(ctx.navigation.cruise_speed() / 4.0);
    } else {
        ctx.navigation.restore_cruise_speed();
    }

    let mut next = TankState::Chase;

    if distance > ctx.config.sight_range() {
        crate::log(&format!("Tank {:?} lost {:?} (out of range)", ctx.entity, hostile));
        next = TankState::Patrol;
    }

    if distance < ctx.config.too_close_distance {
        ctx.navigation.restore_cruise_speed();
        next = TankState::Flee;
    }

    next
}

/// Flee: wander away until the remembered hostile is far enough.
pub(crate) fn update_flee(
    ctx: &mut TankContext,
    lookup: &TankLookup,
    rng: &mut DeterministicRng,
) -> TankState {
    repick_waypoint(ctx, rng);

    let Some((_, hostile_position)) = resolve_target(ctx, lookup) else {
        return lose_target(ctx);
    };

    if ctx.position.distance(hostile_position) > ctx.config.flee_distance {
        TankState::Patrol
    } else {
        TankState::Flee
    }
}

/// Remembered hostile, if it is still a live roster hostile.
fn resolve_target(ctx: &TankContext, lookup: &TankLookup) -> Option<(Entity, Vec3)> {
    let hostile = ctx.target.get()?;
    if !ctx.rosters.is_hostile(hostile) {
        return None;
    }

    let (transform, health) = lookup.get(hostile).ok()?;
    health
        .is_alive()
        .then_some((hostile, transform.translation))
}

fn lose_target(ctx: &mut TankContext) -> TankState {
    crate::log(&format!("Tank {:?} target gone, back to patrol", ctx.entity));
    ctx.navigation.restore_cruise_speed();
    ctx.target.clear();
    TankState::Patrol
}

/// New random waypoint once the current one is (nearly) reached.
fn repick_waypoint(ctx: &mut TankContext, rng: &mut DeterministicRng) {
    if ctx.navigation.distance_to_destination(ctx.position) < ctx.config.waypoint_reach_distance {
        let waypoint = random_point_in(&ctx.config.patrol_area, rng);
        ctx.navigation.set_destination(waypoint);
    }
}

/// Uniform point in the patrol rectangle, on the ground plane.
pub fn random_point_in(area: &PatrolArea, rng: &mut DeterministicRng) -> Vec3 {
    let x = rng.rng.gen_range(area.min.x..=area.max.x);
    let z = rng.rng.gen_range(area.min.y..=area.max.y);
    Vec3::new(x, 0.0, z)
}

/// Dead handler side effects fire on the first call only.
pub(crate) fn begin_teardown(lifecycle: &mut TankLifecycle) -> bool {
    if lifecycle.torn_down {
        return false;
    }
    lifecycle.torn_down = true;
    true
}
