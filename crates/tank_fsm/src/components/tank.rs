//! Tank identity, health, rosters and lifecycle flags

use bevy::prelude::*;

use crate::ai::{HostileTarget, TankState};
use crate::combat::Cannon;
use crate::components::{NavigationAgent, Turret};
use crate::config::TankConfig;

/// Tank: the controlled combat unit.
///
/// Tanks sharing a `squad` are friendly to each other, every other tank is
/// hostile. The rest of the per-tank state comes in through required components.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    TankConfig,
    TankState,
    HostileTarget,
    Turret,
    Cannon,
    NavigationAgent,
    Rosters,
    TankLifecycle
)]
pub struct Tank {
    pub squad: u32,
}

/// Hull health.
///
/// Not clamped on the way down: a hit can push `current` below zero, the FSM
/// turns any `current <= 0` into Dead on its next evaluation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current -= amount;
    }

    pub fn reset(&mut self, max: i32) {
        self.max = max;
        self.current = max;
    }
}

/// Friendly/hostile lookups (non-owning).
///
/// Written only by the roster refresh at end of frame; the FSM reads it.
/// Hostile order is the sensing order.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Rosters {
    pub friendly: Vec<Entity>,
    pub hostile: Vec<Entity>,
}

impl Rosters {
    pub fn is_hostile(&self, entity: Entity) -> bool {
        self.hostile.contains(&entity)
    }
}

/// One-time init / teardown guards.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct TankLifecycle {
    pub initialized: bool,
    /// Set by the Dead handler; teardown side effects fire only on the false → true edge.
    pub torn_down: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_goes_negative() {
        let mut health = Health::new(100);
        health.take_damage(25);
        assert_eq!(health.current, 75);
        assert!(health.is_alive());

        health.take_damage(100);
        assert_eq!(health.current, -25);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_zero_is_dead() {
        let mut health = Health::new(50);
        health.take_damage(50);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_reset() {
        let mut health = Health::new(100);
        health.take_damage(80);
        health.reset(120);
        assert_eq!(health, Health { current: 120, max: 120 });
    }

    #[test]
    fn test_rosters_lookup() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let rosters = Rosters {
            friendly: vec![a],
            hostile: vec![b],
        };

        assert!(!rosters.is_hostile(a));
        assert!(rosters.is_hostile(b));
    }
}
