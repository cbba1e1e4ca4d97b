//! Headless tank battle
//!
//! Two squads in the patrol area, one rock in the middle, 20 Hz manual time.
//! Usage: `tank_fsm [config.ron]`

use bevy::prelude::*;
use std::collections::BTreeMap;
use tank_fsm::{
    create_headless_app, log_error, log_info, log_warning, tank_bundle, SimulationPlugin,
    SphereWorld, Tank, TankConfig, TankState,
};

const SEED: u64 = 42;
const MAX_TICKS: usize = 12000;
const TANK_SPEED: f32 = 30.0;

fn main() {
    let mut app = create_headless_app(SEED);

    let config = match std::env::args().nth(1) {
        Some(path) => match TankConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log_error(&format!("{}", e));
                std::process::exit(1);
            }
        },
        None => TankConfig::default(),
    };

    log_info(&format!("Starting headless tank battle (seed: {})", SEED));

    app.add_plugins(SimulationPlugin);
    app.world_mut()
        .resource_mut::<SphereWorld>()
        .add_obstacle(Vec3::new(1500.0, 0.0, 1500.0), 60.0);

    for i in 0..3 {
        let offset = i as f32 * 150.0;
        app.world_mut().spawn(tank_bundle(
            1,
            Vec3::new(700.0 + offset, 0.0, 700.0),
            TANK_SPEED,
            config.clone(),
        ));
        app.world_mut().spawn(tank_bundle(
            2,
            Vec3::new(2300.0 - offset, 0.0, 2300.0),
            TANK_SPEED,
            config.clone(),
        ));
    }

    for tick in 0..MAX_TICKS {
        app.update();

        let squads = surviving_squads(app.world_mut());

        if tick % 200 == 0 {
            log_info(&format!("Tick {}: {}", tick, describe_states(app.world_mut())));
        }

        if squads.len() <= 1 && tick > 0 {
            match squads.keys().next() {
                Some(squad) => log_info(&format!("Squad {} wins at tick {}", squad, tick)),
                None => log_info(&format!("Mutual destruction at tick {}", tick)),
            }
            return;
        }
    }

    log_warning(&format!("No winner after {} ticks", MAX_TICKS));
}

/// Live tanks per squad.
fn surviving_squads(world: &mut World) -> BTreeMap<u32, usize> {
    let mut squads = BTreeMap::new();
    let mut query = world.query::<(&Tank, &TankState)>();
    for (tank, state) in query.iter(world) {
        if !state.is_dead() {
            *squads.entry(tank.squad).or_insert(0) += 1;
        }
    }
    squads
}

fn describe_states(world: &mut World) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut query = world.query::<&TankState>();
    for state in query.iter(world) {
        *counts.entry(state.as_str()).or_insert(0) += 1;
    }

    counts
        .iter()
        .map(|(state, count)| format!("{} {}", count, state))
        .collect::<Vec<_>>()
        .join(", ")
}
