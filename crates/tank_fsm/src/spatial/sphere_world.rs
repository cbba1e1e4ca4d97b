//! Headless `SpatialQuery`: tanks and obstacles as spheres

use bevy::prelude::*;

use super::{ColliderTag, RayHit, SpatialQuery};
use crate::components::{Health, Tank};

/// Sphere collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub entity: Option<Entity>,
    pub center: Vec3,
    pub radius: f32,
    pub tag: ColliderTag,
}

/// Collider set answering raycasts.
///
/// Tank spheres are rebuilt from `Transform` each frame by `sync_sphere_world`;
/// static obstacles survive the sync.
#[derive(Resource, Debug, Clone)]
pub struct SphereWorld {
    pub tank_radius: f32,
    tanks: Vec<SphereCollider>,
    obstacles: Vec<SphereCollider>,
}

impl Default for SphereWorld {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl SphereWorld {
    pub fn new(tank_radius: f32) -> Self {
        Self {
            tank_radius,
            tanks: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Static terrain sphere (rock, building).
    pub fn add_obstacle(&mut self, center: Vec3, radius: f32) {
        self.obstacles.push(SphereCollider {
            entity: None,
            center,
            radius,
            tag: ColliderTag::Terrain,
        });
    }

    pub fn set_tanks(&mut self, tanks: impl IntoIterator<Item = (Entity, Vec3)>) {
        let radius = self.tank_radius;
        self.tanks = tanks
            .into_iter()
            .map(|(entity, center)| SphereCollider {
                entity: Some(entity),
                center,
                radius,
                tag: ColliderTag::Tank,
            })
            .collect();
    }

    pub fn colliders(&self) -> impl Iterator<Item = &SphereCollider> {
        self.tanks.iter().chain(self.obstacles.iter())
    }
}

impl SpatialQuery for SphereWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;

        for collider in self.colliders() {
            let Some(distance) = ray_sphere(origin, direction, collider.center, collider.radius)
            else {
                continue;
            };

            if distance > max_distance {
                continue;
            }

            if best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    point: origin + direction * distance,
                    distance,
                    entity: collider.entity,
                    tag: collider.tag,
                });
            }
        }

        best
    }
}

/// Entry distance along a normalized ray, `None` on a miss or if the origin is inside.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = origin - center;
    let c = to_origin.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }

    let b = to_origin.dot(direction);
    if b > 0.0 {
        // Sphere is behind the origin
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some(-b - discriminant.sqrt())
}

/// System: rebuild tank spheres from live tanks.
///
/// Sorted by entity index so raycast ties resolve the same way every run.
pub fn sync_sphere_world(
    mut world: ResMut<SphereWorld>,
    tanks: Query<(Entity, &Transform, &Health), With<Tank>>,
) {
    let mut live: Vec<(Entity, Vec3)> = tanks
        .iter()
        .filter(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| (entity, transform.translation))
        .collect();
    live.sort_by_key(|(entity, _)| entity.index());

    world.set_tanks(live);
}
