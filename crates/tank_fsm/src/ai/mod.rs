//! Tank behavior controller
//!
//! Per-tank FSM (Patrol / Chase / Flee, Dead absorbing) driven once per frame.
//! The plugin is generic over the line-of-sight backend so the same systems
//! run against the headless `SphereWorld` or a host engine's physics.

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod fsm;
pub mod perception;
pub mod state;


pub use fsm::{random_point_in, tank_fsm_tick};
pub use perception::{sense_hostiles, Sighting};
pub use state::{HostileTarget, TankState};

use crate::combat::{apply_contact_damage, ContactEvent, DamageDealt, ProjectileSpawnRequest};
use crate::lifecycle::{
    despawn_destroyed_tanks, initialize_tanks, refresh_rosters, RosterRefresh, TankDestroyed,
};
use crate::spatial::SpatialQuery;
use crate::DeterministicRng;

/// Tank AI Plugin
///
/// System order (Update, chained):
/// 1. apply_contact_damage: bullets → Health (before the FSM reads it)
/// 2. tank_fsm_tick: one FSM evaluation per initialized tank
/// 3. despawn_destroyed_tanks: remove torn down tanks
/// 4. initialize_tanks: one-time init for tanks spawned this frame
/// 5. refresh_rosters: friendly/hostile lists after spawns and deaths
///
/// The `S` resource must be inserted by whoever adds the plugin.
pub struct TankAiPlugin<S: SpatialQuery> {
    _spatial: PhantomData<fn() -> S>,
}

impl<S: SpatialQuery> Default for TankAiPlugin<S> {
    fn default() -> Self {
        Self {
            _spatial: PhantomData,
        }
    }
}

impl<S: SpatialQuery> Plugin for TankAiPlugin<S> {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::default());
        }

        app.register_type::<TankState>()
            .register_type::<HostileTarget>()
            .add_event::<ContactEvent>()
            .add_event::<DamageDealt>()
            .add_event::<ProjectileSpawnRequest>()
            .add_event::<TankDestroyed>()
            .init_resource::<RosterRefresh>()
            .add_systems(
                Update,
                (
                    apply_contact_damage,
                    tank_fsm_tick::<S>,
                    despawn_destroyed_tanks,
                    initialize_tanks,
                    refresh_rosters,
                )
                    .chain(),
            );
    }
}
