//! Tank lifecycle: one-time init, roster upkeep, removal after teardown
//!
//! Runs after the FSM in the same frame, so a tank spawned this frame is
//! initialized before its first evaluation next frame, and a tank torn down
//! this frame disappears from everyone's hostile roster before anyone senses again.

use bevy::prelude::*;

use crate::ai::TankState;
use crate::combat::Cannon;
use crate::components::{Health, NavigationAgent, Rosters, Tank, TankLifecycle, Turret};
use crate::config::TankConfig;

/// Event: a tank entered Dead and ran its teardown (emitted exactly once per tank).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TankDestroyed {
    pub entity: Entity,
    pub squad: u32,
    /// Hull position at the moment of death (explosion effect spawn point)
    pub position: Vec3,
}

/// Roster rebuild request (set on tank init, consumed by `refresh_rosters`).
#[derive(Resource, Debug, Default)]
pub struct RosterRefresh {
    pub requested: bool,
}

/// System: one-time init of freshly spawned tanks.
///
/// Captures cruise speed, parks the waypoint on the spawn point (so the first
/// Patrol tick picks a random one), fills health and aligns the turret with the hull.
/// A config that fails `validate` is swapped for the default one.
pub fn initialize_tanks(
    mut tanks: Query<
        (
            Entity,
            &Tank,
            &Transform,
            &mut TankConfig,
            &mut Health,
            &mut TankState,
            &mut Turret,
            &mut Cannon,
            &mut NavigationAgent,
            &mut TankLifecycle,
        ),
    >,
    mut refresh: ResMut<RosterRefresh>,
) {
    for (
        entity,
        tank,
        transform,
        mut config,
        mut health,
        mut state,
        mut turret,
        mut cannon,
        mut navigation,
        mut lifecycle,
    ) in tanks.iter_mut()
    {
        if lifecycle.initialized {
            continue;
        }

        if let Err(error) = config.validate() {
            crate::logger::log_warning(&format!(
                "Tank {:?}: {}, falling back to defaults",
                entity, error
            ));
            *config = TankConfig::default();
        }

        health.reset(config.max_health);
        *state = TankState::Patrol;
        turret.rotation = transform.rotation;
        *cannon = Cannon::new(config.shoot_interval);

        navigation.base_speed = navigation.speed;
        navigation.crippled = false;
        navigation.set_destination(transform.translation);

        lifecycle.initialized = true;
        lifecycle.torn_down = false;
        refresh.requested = true;

        crate::log(&format!(
            "Tank {:?} (squad {}) ready at {:?}, cruise speed {:.1}",
            entity, tank.squad, transform.translation, navigation.base_speed
        ));
    }
}

/// System: rebuild friendly/hostile rosters.
///
/// Only runs when something changed (new tanks or `TankDestroyed` this frame).
/// Members are initialized, alive and not torn down; sorted by entity index so
/// sensing order is stable.
pub fn refresh_rosters(
    mut refresh: ResMut<RosterRefresh>,
    mut destroyed: EventReader<TankDestroyed>,
    mut tanks: Query<(Entity, &Tank, &Health, &TankLifecycle, &mut Rosters)>,
) {
    let deaths = destroyed.read().count();
    if deaths == 0 && !refresh.requested {
        return;
    }
    refresh.requested = false;

    let mut members: Vec<(Entity, u32)> = tanks
        .iter()
        .filter(|(_, _, health, lifecycle, _)| is_member(health, lifecycle))
        .map(|(entity, tank, ..)| (entity, tank.squad))
        .collect();
    members.sort_by_key(|(entity, _)| entity.index());

    for (entity, tank, health, lifecycle, mut rosters) in tanks.iter_mut() {
        if !is_member(health, lifecycle) {
            if !rosters.friendly.is_empty() || !rosters.hostile.is_empty() {
                *rosters = Rosters::default();
            }
            continue;
        }

        let updated = compute_rosters(entity, tank.squad, &members);
        if *rosters != updated {
            *rosters = updated;
        }
    }

    crate::log(&format!(
        "Rosters refreshed: {} tanks in play ({} destroyed this frame)",
        members.len(),
        deaths
    ));
}

fn is_member(health: &Health, lifecycle: &TankLifecycle) -> bool {
    lifecycle.initialized && !lifecycle.torn_down && health.is_alive()
}

/// Rosters of `entity` given every live member: same squad is friendly (minus self), other squads hostile.
pub fn compute_rosters(entity: Entity, squad: u32, members: &[(Entity, u32)]) -> Rosters {
    let mut rosters = Rosters::default();

    for &(other, other_squad) in members {
        if other == entity {
            continue;
        }

        if other_squad == squad {
            rosters.friendly.push(other);
        } else {
            rosters.hostile.push(other);
        }
    }

    rosters
}

/// System: remove torn down tanks.
///
/// Host engine visuals (explosion, wreck) hang off `TankDestroyed`, not the despawn.
pub fn despawn_destroyed_tanks(mut commands: Commands, mut destroyed: EventReader<TankDestroyed>) {
    for event in destroyed.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.despawn();
            crate::log(&format!("Tank {:?} removed", event.entity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatrolArea;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_compute_rosters_splits_by_squad() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let c = Entity::from_raw(3);
        let members = [(a, 1), (b, 1), (c, 2)];

        let rosters = compute_rosters(a, 1, &members);
        assert_eq!(rosters.friendly, vec![b]);
        assert_eq!(rosters.hostile, vec![c]);

        let rosters = compute_rosters(c, 2, &members);
        assert!(rosters.friendly.is_empty());
        assert_eq!(rosters.hostile, vec![a, b]);
    }

    #[test]
    fn test_tank_is_never_in_its_own_roster() {
        let a = Entity::from_raw(5);
        let rosters = compute_rosters(a, 1, &[(a, 1)]);
        assert!(!rosters.friendly.contains(&a));
        assert!(!rosters.is_hostile(a));
    }

    fn setup_world() -> World {
        let mut world = World::new();
        world.init_resource::<RosterRefresh>();
        world.init_resource::<Events<TankDestroyed>>();
        world
    }

    #[test]
    fn test_initialize_tank() {
        let mut world = setup_world();
        let position = Vec3::new(700.0, 0.0, 900.0);
        let hull = Quat::from_rotation_y(0.7);
        let tank = world
            .spawn((
                Tank { squad: 1 },
                Transform::from_translation(position).with_rotation(hull),
                NavigationAgent::with_speed(24.0),
                TankConfig {
                    max_health: 150,
                    shoot_interval: 1.5,
                    ..default()
                },
            ))
            .id();
        world.get_mut::<Health>(tank).unwrap().current = 3;

        world.run_system_once(initialize_tanks).unwrap();

        let health = world.get::<Health>(tank).unwrap();
        assert_eq!(health.current, 150);
        assert_eq!(health.max, 150);

        let navigation = world.get::<NavigationAgent>(tank).unwrap();
        assert_eq!(navigation.base_speed, 24.0);
        assert_eq!(navigation.destination, position);

        assert_eq!(world.get::<Turret>(tank).unwrap().rotation, hull);
        assert_eq!(world.get::<Cannon>(tank).unwrap().shoot_interval, 1.5);
        assert_eq!(*world.get::<TankState>(tank).unwrap(), TankState::Patrol);
        assert!(world.get::<TankLifecycle>(tank).unwrap().initialized);
        assert!(world.resource::<RosterRefresh>().requested);
    }

    #[test]
    fn test_initialize_replaces_invalid_config() {
        let mut world = setup_world();
        let tank = world
            .spawn((
                Tank { squad: 1 },
                NavigationAgent::with_speed(24.0),
                TankConfig {
                    patrol_area: PatrolArea {
                        min: Vec2::ZERO,
                        max: Vec2::new(f32::INFINITY, 10.0),
                    },
                    ..default()
                },
            ))
            .id();

        world.run_system_once(initialize_tanks).unwrap();

        assert_eq!(*world.get::<TankConfig>(tank).unwrap(), TankConfig::default());
        assert!(world.get::<TankLifecycle>(tank).unwrap().initialized);
    }

    #[test]
    fn test_initialize_runs_once() {
        let mut world = setup_world();
        let tank = world.spawn(Tank { squad: 1 }).id();

        world.run_system_once(initialize_tanks).unwrap();
        world.resource_mut::<RosterRefresh>().requested = false;
        world.get_mut::<Health>(tank).unwrap().current = 10;

        world.run_system_once(initialize_tanks).unwrap();

        assert_eq!(world.get::<Health>(tank).unwrap().current, 10);
        assert!(!world.resource::<RosterRefresh>().requested);
    }

    #[test]
    fn test_refresh_rosters_after_init() {
        let mut world = setup_world();
        let a = world.spawn(Tank { squad: 1 }).id();
        let b = world.spawn(Tank { squad: 1 }).id();
        let c = world.spawn(Tank { squad: 2 }).id();

        world.run_system_once(initialize_tanks).unwrap();
        world.run_system_once(refresh_rosters).unwrap();

        let rosters = world.get::<Rosters>(a).unwrap();
        assert_eq!(rosters.friendly, vec![b]);
        assert_eq!(rosters.hostile, vec![c]);
        assert_eq!(world.get::<Rosters>(c).unwrap().hostile, vec![a, b]);
        assert!(!world.resource::<RosterRefresh>().requested);
    }

    #[test]
    fn test_destroyed_tank_leaves_rosters() {
        let mut world = setup_world();
        let a = world.spawn(Tank { squad: 1 }).id();
        let b = world.spawn(Tank { squad: 2 }).id();
        world.run_system_once(initialize_tanks).unwrap();
        world.run_system_once(refresh_rosters).unwrap();
        assert_eq!(world.get::<Rosters>(a).unwrap().hostile, vec![b]);

        world.get_mut::<Health>(b).unwrap().current = 0;
        world.get_mut::<TankLifecycle>(b).unwrap().torn_down = true;
        world.send_event(TankDestroyed {
            entity: b,
            squad: 2,
            position: Vec3::ZERO,
        });
        world.run_system_once(refresh_rosters).unwrap();

        assert!(world.get::<Rosters>(a).unwrap().hostile.is_empty());
        assert_eq!(*world.get::<Rosters>(b).unwrap(), Rosters::default());
    }

    #[test]
    fn test_rosters_untouched_without_changes() {
        let mut world = setup_world();
        let a = world.spawn(Tank { squad: 1 }).id();
        let b = world.spawn(Tank { squad: 2 }).id();
        world.run_system_once(initialize_tanks).unwrap();
        world.run_system_once(refresh_rosters).unwrap();

        // Stale on purpose: nothing requested a refresh, so it stays
        world.get_mut::<Rosters>(a).unwrap().hostile.clear();
        world.run_system_once(refresh_rosters).unwrap();

        assert!(world.get::<Rosters>(a).unwrap().hostile.is_empty());
        assert_eq!(world.get::<Rosters>(b).unwrap().hostile, vec![a]);
    }

    #[test]
    fn test_despawn_destroyed_tanks() {
        let mut world = setup_world();
        let tank = world.spawn(Tank { squad: 1 }).id();
        let survivor = world.spawn(Tank { squad: 1 }).id();

        world.send_event(TankDestroyed {
            entity: tank,
            squad: 1,
            position: Vec3::ZERO,
        });
        world.run_system_once(despawn_destroyed_tanks).unwrap();

        assert!(world.get_entity(tank).is_err());
        assert!(world.get_entity(survivor).is_ok());
    }
}
