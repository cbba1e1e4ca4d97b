//! Behavior state + remembered hostile

use bevy::prelude::*;

/// Tank behavior state.
///
/// Exactly one per tank. `Dead` is absorbing: once entered, nothing leaves it.
/// `Attack` and `Evade` are reserved (handlers are no-ops).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum TankState {
    #[default]
    Patrol,
    Chase,
    Flee,
    Attack,
    Evade,
    Dead,
}

impl TankState {
    pub fn is_dead(&self) -> bool {
        matches!(self, TankState::Dead)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TankState::Patrol => "Patrol",
            TankState::Chase => "Chase",
            TankState::Flee => "Flee",
            TankState::Attack => "Attack",
            TankState::Evade => "Evade",
            TankState::Dead => "Dead",
        }
    }
}

/// Hostile the tank is currently reacting to (Chase/Flee).
///
/// Non-owning: the entity may despawn at any time, readers validate it first.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct HostileTarget(pub Option<Entity>);

impl HostileTarget {
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    pub fn set(&mut self, entity: Entity) {
        self.0 = Some(entity);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
