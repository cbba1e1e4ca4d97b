//! Cannon: cooldown-gated fire control
//!
//! ECS owns the decision ("cooldown elapsed, turret on target, in the fire
//! band"); the host engine owns the projectile (spawn, flight, collision).
//! The two meet at `ProjectileSpawnRequest`.

use bevy::prelude::*;

/// Cooldown state of the main gun.
///
/// `elapsed` counts up from the last shot; a shot is allowed once it reaches
/// `shoot_interval`. No ammo, no misfires.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Cannon {
    pub elapsed: f32,
    pub shoot_interval: f32,
}

impl Default for Cannon {
    fn default() -> Self {
        Self::new(3.0)
    }
}

/// Outcome of a fire attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    Fire,
    Hold,
}

impl Cannon {
    pub fn new(shoot_interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            shoot_interval,
        }
    }

    /// Advance cooldown accounting by one tick.
    pub fn tick(&mut self, delta: f32) {
        self.elapsed += delta;
    }

    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.shoot_interval
    }

    /// Fire if the interval has elapsed; firing resets the timer.
    pub fn try_fire(&mut self) -> FireDecision {
        if !self.is_ready() {
            return FireDecision::Hold;
        }

        self.elapsed = 0.0;
        FireDecision::Fire
    }
}

/// Event: spawn a projectile at the muzzle pose (ECS → host engine).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileSpawnRequest {
    /// Who fired (for self-hit filtering on the host side)
    pub shooter: Entity,

    /// What the shooter was aiming at
    pub target: Option<Entity>,

    /// Muzzle position, world space
    pub position: Vec3,

    /// Turret rotation at the moment of firing
    pub rotation: Quat,
}

impl ProjectileSpawnRequest {
    /// Flight direction (turret forward).
    pub fn direction(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}
