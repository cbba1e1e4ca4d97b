//! Spatial queries (line of sight)
//!
//! Physics/collision belongs to the host engine. The FSM only needs one
//! question answered synchronously inside its tick: "what does a ray from
//! here in that direction hit first?". That is the `SpatialQuery` seam.
//!
//! `SphereWorld` is the headless answer (tests, the headless binary).

use bevy::prelude::*;

pub mod sphere_world;

pub use sphere_world::{sync_sphere_world, SphereCollider, SphereWorld};

/// Collision tag carried by whatever a ray hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ColliderTag {
    Tank,
    Bullet,
    Terrain,
}

/// First obstruction along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    /// Entity behind the collider, if it is one (static terrain usually isn't).
    pub entity: Option<Entity>,
    pub tag: ColliderTag,
}

/// Line-of-sight backend.
///
/// `direction` need not be normalized. A ray starting inside a collider does
/// not report that collider. `None` means nothing within `max_distance`.
pub trait SpatialQuery: Resource {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}
