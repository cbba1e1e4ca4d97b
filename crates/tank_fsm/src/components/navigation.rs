//! Navigation command component (read by the external mover)

use bevy::prelude::*;

/// Destination + speed handed to the navigation collaborator.
///
/// The FSM only writes `destination` and `speed`; whoever owns pathfinding
/// moves the `Transform`. `base_speed` is captured once at init.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    pub destination: Vec3,
    pub speed: f32,
    pub base_speed: f32,
    /// Health dropped to the cripple threshold; cruise speed is halved from then on.
    pub crippled: bool,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            destination: Vec3::ZERO,
            speed: 30.0,
            base_speed: 30.0,
            crippled: false,
        }
    }
}

impl NavigationAgent {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            base_speed: speed,
            ..default()
        }
    }

    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = point;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn distance_to_destination(&self, position: Vec3) -> f32 {
        position.distance(self.destination)
    }

    /// Full speed for the current damage level.
    pub fn cruise_speed(&self) -> f32 {
        if self.crippled {
            self.base_speed / 2.0
        } else {
            self.base_speed
        }
    }

    pub fn restore_cruise_speed(&mut self) {
        self.speed = self.cruise_speed();
    }

    /// Halve cruise speed permanently. Returns false if already crippled.
    pub fn cripple(&mut self) -> bool {
        if self.crippled {
            return false;
        }
        self.crippled = true;
        self.speed = self.cruise_speed();
        true
    }
}
