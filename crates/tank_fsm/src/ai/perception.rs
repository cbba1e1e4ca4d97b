//! Line-of-sight sensing
//!
//! One ray per roster hostile, cast from the turret pivot along the
//! hull → hostile direction. The last ray that hits anything decides the
//! outcome (roster order), so a blocked ray after a clear one hides the
//! earlier sighting. A ray only sees the hostile it was cast at: a wingman
//! or another hostile in front of it blocks the ray like a rock would.

use bevy::prelude::*;

use crate::spatial::{ColliderTag, SpatialQuery};

/// Outcome of one sensing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sighting {
    /// No ray hit anything.
    #[default]
    Nothing,
    /// Last ray struck the hostile it was aimed at.
    Spotted(Entity),
    /// Last ray struck something else first.
    Blocked,
}

impl Sighting {
    pub fn target(&self) -> Option<Entity> {
        match self {
            Sighting::Spotted(entity) => Some(*entity),
            Sighting::Nothing | Sighting::Blocked => None,
        }
    }
}

/// Cast sight rays toward every hostile.
///
/// `hull` sets the ray direction, `eye` (turret pivot) is the ray origin.
/// A ray counts as a sighting only when its first hit is that hostile's
/// own hull.
pub fn sense_hostiles<S: SpatialQuery>(
    spatial: &S,
    hull: Vec3,
    eye: Vec3,
    max_distance: f32,
    hostiles: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Sighting {
    let mut sighting = Sighting::Nothing;

    for (hostile, position) in hostiles {
        let Some(hit) = spatial.raycast(eye, position - hull, max_distance) else {
            continue;
        };

        sighting = match (hit.tag, hit.entity) {
            (ColliderTag::Tank, Some(struck)) if struck == hostile => Sighting::Spotted(hostile),
            _ => Sighting::Blocked,
        };
    }

    sighting
}
