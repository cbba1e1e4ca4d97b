//! Headless stand-ins for the host engine
//!
//! In a game client the engine moves tanks along `NavigationAgent`, flies the
//! projectiles and reports collisions. Headless (tests, the binary) these
//! systems do the same job in the crudest possible way: straight-line moves
//! on the XZ plane and hitscan bullets against `SphereWorld`.

use bevy::prelude::*;

use crate::combat::{ContactEvent, ProjectileSpawnRequest};
use crate::components::{Health, NavigationAgent, Tank, TankLifecycle};
use crate::spatial::{sync_sphere_world, ColliderTag, SpatialQuery, SphereWorld};

/// Max hitscan reach of a bullet.
pub const BULLET_RANGE: f32 = 1000.0;

/// Closer than this the mover considers the destination reached.
const ARRIVAL_EPSILON: f32 = 0.01;

/// Headless World Plugin
///
/// PreUpdate (chained), so the FSM in Update sees this frame's positions and contacts:
/// 1. resolve_projectiles_hitscan: last frame's shots → ContactEvent
/// 2. advance_navigation: move toward destination
/// 3. sync_sphere_world: colliders follow the tanks
pub struct HeadlessWorldPlugin;

impl Plugin for HeadlessWorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SphereWorld>()
            .add_event::<ContactEvent>()
            .add_event::<ProjectileSpawnRequest>()
            .add_systems(
                PreUpdate,
                (resolve_projectiles_hitscan, advance_navigation, sync_sphere_world).chain(),
            );
    }
}

/// System: straight-line movement toward the navigation destination.
pub fn advance_navigation(
    time: Res<Time>,
    mut tanks: Query<(&mut Transform, &NavigationAgent, &Health, &TankLifecycle), With<Tank>>,
) {
    let delta = time.delta_secs();

    for (mut transform, navigation, health, lifecycle) in tanks.iter_mut() {
        if !lifecycle.initialized || !health.is_alive() {
            continue;
        }

        let mut offset = navigation.destination - transform.translation;
        offset.y = 0.0;

        let distance = offset.length();
        if distance < ARRIVAL_EPSILON {
            continue;
        }

        let step = (navigation.speed * delta).min(distance);
        transform.translation += offset / distance * step;
    }
}

/// System: resolve spawn requests as instant rays.
///
/// A ray that first meets a tank other than the shooter becomes a bullet contact.
pub fn resolve_projectiles_hitscan(
    world: Res<SphereWorld>,
    mut requests: EventReader<ProjectileSpawnRequest>,
    mut contacts: EventWriter<ContactEvent>,
) {
    for request in requests.read() {
        let Some(hit) = world.raycast(request.position, request.direction(), BULLET_RANGE) else {
            continue;
        };

        match (hit.tag, hit.entity) {
            (ColliderTag::Tank, Some(tank)) if tank != request.shooter => {
                crate::log(&format!(
                    "Bullet from {:?} hit {:?} at {:.1}",
                    request.shooter, tank, hit.distance
                ));
                contacts.write(ContactEvent::bullet(tank));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn ready_tank(world: &mut World, position: Vec3, destination: Vec3, speed: f32) -> Entity {
        let mut navigation = NavigationAgent::with_speed(speed);
        navigation.set_destination(destination);
        world
            .spawn((
                Tank { squad: 1 },
                Transform::from_translation(position),
                navigation,
                TankLifecycle {
                    initialized: true,
                    torn_down: false,
                },
            ))
            .id()
    }

    fn world_with_time(delta_secs: f32) -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(delta_secs));
        world.insert_resource(time);
        world
    }

    #[test]
    fn test_advance_navigation_moves_on_xz() {
        let mut world = world_with_time(1.0);
        let tank = ready_tank(&mut world, Vec3::ZERO, Vec3::new(100.0, 50.0, 0.0), 10.0);

        world.run_system_once(advance_navigation).unwrap();

        let position = world.get::<Transform>(tank).unwrap().translation;
        assert!((position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4, "{:?}", position);
    }

    #[test]
    fn test_advance_navigation_does_not_overshoot() {
        let mut world = world_with_time(1.0);
        let tank = ready_tank(&mut world, Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), 100.0);

        world.run_system_once(advance_navigation).unwrap();

        let position = world.get::<Transform>(tank).unwrap().translation;
        assert!((position - Vec3::new(3.0, 0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_dead_tank_does_not_move() {
        let mut world = world_with_time(1.0);
        let tank = ready_tank(&mut world, Vec3::ZERO, Vec3::X * 100.0, 10.0);
        world.get_mut::<Health>(tank).unwrap().current = 0;

        world.run_system_once(advance_navigation).unwrap();

        assert_eq!(world.get::<Transform>(tank).unwrap().translation, Vec3::ZERO);
    }

    fn hitscan_world() -> World {
        let mut world = World::new();
        world.insert_resource(SphereWorld::default());
        world.init_resource::<Events<ProjectileSpawnRequest>>();
        world.init_resource::<Events<ContactEvent>>();
        world
    }

    fn shot(shooter: Entity, from: Vec3, toward: Vec3) -> ProjectileSpawnRequest {
        ProjectileSpawnRequest {
            shooter,
            target: None,
            position: from,
            rotation: Transform::IDENTITY.looking_to(toward, Vec3::Y).rotation,
        }
    }

    #[test]
    fn test_hitscan_hits_tank() {
        let mut world = hitscan_world();
        let shooter = Entity::from_raw(1);
        let target = Entity::from_raw(2);
        world
            .resource_mut::<SphereWorld>()
            .set_tanks([(shooter, Vec3::ZERO), (target, Vec3::X * 250.0)]);

        world.send_event(shot(shooter, Vec3::new(3.0, 2.0, 0.0), Vec3::X));
        world.run_system_once(resolve_projectiles_hitscan).unwrap();

        let contacts: Vec<_> = world.resource_mut::<Events<ContactEvent>>().drain().collect();
        assert_eq!(contacts, vec![ContactEvent::bullet(target)]);
    }

    #[test]
    fn test_hitscan_blocked_by_terrain() {
        let mut world = hitscan_world();
        let shooter = Entity::from_raw(1);
        let target = Entity::from_raw(2);
        {
            let mut spheres = world.resource_mut::<SphereWorld>();
            spheres.set_tanks([(shooter, Vec3::ZERO), (target, Vec3::X * 250.0)]);
            spheres.add_obstacle(Vec3::X * 100.0, 20.0);
        }

        world.send_event(shot(shooter, Vec3::new(3.0, 2.0, 0.0), Vec3::X));
        world.run_system_once(resolve_projectiles_hitscan).unwrap();

        assert!(world.resource::<Events<ContactEvent>>().is_empty());
    }

    #[test]
    fn test_hitscan_miss() {
        let mut world = hitscan_world();
        let shooter = Entity::from_raw(1);
        world
            .resource_mut::<SphereWorld>()
            .set_tanks([(shooter, Vec3::ZERO), (Entity::from_raw(2), Vec3::X * 250.0)]);

        world.send_event(shot(shooter, Vec3::new(0.0, 2.0, -3.0), Vec3::NEG_Z));
        world.run_system_once(resolve_projectiles_hitscan).unwrap();

        assert!(world.resource::<Events<ContactEvent>>().is_empty());
    }
}
