//! Turret aim (world-space rotation, independent of the hull)

use bevy::prelude::*;

use crate::config::TankConfig;

/// Turret rotation, world space.
///
/// Interpolated toward the aim rotation every Chase tick. Forward is -Z
/// (Bevy convention), so the muzzle sits at `pivot + rotation * -Z * muzzle_length`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Turret {
    pub rotation: Quat,
}

impl Default for Turret {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
        }
    }
}

impl Turret {
    /// Turret pivot in world space.
    pub fn pivot(hull_position: Vec3, config: &TankConfig) -> Vec3 {
        hull_position + Vec3::Y * config.turret_height
    }

    /// Muzzle pose: pivot pushed forward along the turret axis, turret rotation.
    pub fn muzzle_pose(&self, hull_position: Vec3, config: &TankConfig) -> (Vec3, Quat) {
        let position =
            Self::pivot(hull_position, config) + self.rotation * Vec3::NEG_Z * config.muzzle_length;
        (position, self.rotation)
    }

    /// One bounded interpolation step toward `target`.
    pub fn rotate_towards(&mut self, target: Quat, factor: f32) {
        self.rotation = slerp_towards(self.rotation, target, factor);
    }

    /// Fire gate: exact equality with the aim rotation.
    pub fn is_aligned(&self, target: Quat) -> bool {
        self.rotation == target
    }
}

/// Rotation looking from `from` toward `to`, world up.
///
/// Degenerate (zero-length) directions keep the default forward.
pub fn aim_rotation(from: Vec3, to: Vec3) -> Quat {
    let direction = to - from;
    if direction.length_squared() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation
}

/// Residual angle (radians) below which a slerp step lands on the target.
pub const SETTLE_ANGLE: f32 = 1e-3;

/// Slerp with the factor clamped to [0, 1].
///
/// A full step lands exactly on `target`. So does a partial step that leaves
/// less than `SETTLE_ANGLE` to go, otherwise repeated partial steps would
/// approach a still target forever without ever matching it.
pub fn slerp_towards(current: Quat, target: Quat, factor: f32) -> Quat {
    let t = factor.clamp(0.0, 1.0);
    if t >= 1.0 || current == target {
        return target;
    }

    let next = current.slerp(target, t);
    if next.angle_between(target) < SETTLE_ANGLE {
        target
    } else {
        next
    }
}
