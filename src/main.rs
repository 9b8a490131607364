//! Headless demo: carve a maze, then drive a swarm of path-following
//! agents through it under the shared search ceiling.

use mazeswarm::prelude::*;

/// Fixed tick length for the demo loop.
const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Simulated ticks (one minute at 60 Hz).
const TICKS: u32 = 3600;
/// Progress report interval in ticks.
const REPORT_EVERY: u32 = 300;

fn main() {
    env_logger::init();

    let config = SimConfig::default()
        .with_tiles(128, 20)
        .with_extension_depth(20)
        .with_agent_rows(10)
        .with_seed(17);
    let mut sim = Simulation::new(config);

    for tick in 0..TICKS {
        sim.tick(TICK_SECONDS);

        if tick % REPORT_EVERY == 0 {
            report(&sim, tick);
        }

        if let Some(nav) = sim.nav() {
            if nav.finished_count() == nav.client_count() {
                log::info!(
                    "all {} paths resolved after {} ticks",
                    nav.client_count(),
                    sim.ticks()
                );
                break;
            }
        }
    }

    report(&sim, TICKS);
}

fn report(sim: &Simulation, tick: u32) {
    if sim.is_carving() {
        log::info!("tick {tick}: carving ({} nodes)", sim.graph().len());
        return;
    }
    let Some(nav) = sim.nav() else {
        return;
    };
    let moving = sim
        .agents()
        .iter()
        .filter(|a| a.velocity().length_squared() > 1e-6)
        .count();
    log::info!(
        "tick {tick}: searches {} live / {} pending / {} finished, {moving} agents moving",
        nav.live_count(),
        nav.pending_count(),
        nav.finished_count(),
    );
}
