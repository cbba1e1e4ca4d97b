//! Tank FSM Simulation Core
//!
//! Per-tank behavior controller on Bevy 0.16 ECS (headless).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = decisions (FSM, fire control, damage rules, rosters)
//! - Host engine = physics, navigation, projectiles, rendering
//!
//! The two meet at components (`NavigationAgent`, `Turret`), events
//! (`ProjectileSpawnRequest`, `ContactEvent`, `TankDestroyed`) and the
//! `SpatialQuery` resource. `HeadlessWorldPlugin` plays the host engine for
//! tests and the headless binary.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod headless;
pub mod lifecycle;
pub mod logger;
pub mod spatial;

pub use ai::{HostileTarget, TankAiPlugin, TankState};
pub use combat::{Cannon, ContactEvent, DamageDealt, FireDecision, ProjectileSpawnRequest};
pub use components::*;
pub use config::{ConfigError, PatrolArea, TankConfig};
pub use headless::HeadlessWorldPlugin;
pub use lifecycle::TankDestroyed;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use spatial::{ColliderTag, RayHit, SpatialQuery, SphereWorld};

/// Default simulation rate of the headless app.
///
/// With the default `rotation_speed` of 10 a turret covers half of the
/// remaining angle per frame.
pub const TICK_HZ: f64 = 20.0;

/// Main headless plugin: tank AI against `SphereWorld` + headless host stand-ins.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Tank>()
            .register_type::<Health>()
            .register_type::<TankConfig>()
            .register_type::<NavigationAgent>()
            .register_type::<Turret>()
            .register_type::<Cannon>()
            .add_plugins((
                HeadlessWorldPlugin,
                TankAiPlugin::<SphereWorld>::default(),
            ));
    }
}

/// Deterministic RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App for headless simulation.
///
/// Time advances by exactly `1 / TICK_HZ` per `update()` (the very first
/// update has zero delta), so runs are reproducible regardless of wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )));

    app
}

/// Components of a freshly spawned tank; the rest comes from `Tank`'s required components.
pub fn tank_bundle(squad: u32, position: Vec3, speed: f32, config: TankConfig) -> impl Bundle {
    (
        Tank { squad },
        Transform::from_translation(position),
        NavigationAgent::with_speed(speed),
        config,
    )
}

/// World snapshot for determinism comparisons
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Sort by entity index, query order is not part of the contract
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug formatting is enough for equality checks
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
