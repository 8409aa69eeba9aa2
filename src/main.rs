/*
 * Headless Boid Flocking Runner
 *
 * Runs a flock without any window: loads settings (optionally from a TOML
 * file), spawns the initial boids, steps the simulation at a fixed rate, and
 * logs a summary once per simulated second.
 *
 * Usage: flock-sim [settings.toml] [ticks]
 * Log verbosity follows RUST_LOG (default "info").
 */

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flock_sim::{FlockSettings, Simulation, SphereObstacles, DEFAULT_TICK_RATE};

const DEFAULT_TICKS: u64 = 600;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => FlockSettings::from_file(&path).with_context(|| format!("loading settings from {path}"))?,
        None => FlockSettings::default(),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid tick count {raw:?}"))?,
        None => DEFAULT_TICKS,
    };

    // A pair of pillars near the spawn cube so collision avoidance has work to do
    let obstacles = SphereObstacles::new()
        .with(Vec3::new(0.0, 0.0, 6.0), 1.5)
        .with(Vec3::new(-4.0, 1.0, -3.0), 1.0);

    let mut sim = Simulation::with_probe(settings, obstacles)?;
    sim.reset(&mut rand::thread_rng());
    info!(boids = sim.flock.len(), ticks, "starting simulation");

    let delta_time = sim.step_size().as_secs_f32();
    let report_every = DEFAULT_TICK_RATE as u64;
    for tick in 1..=ticks {
        let stats = sim.step(delta_time);

        if tick % report_every == 0 || tick == ticks {
            let boids = sim.flock.neighbors();
            let mean_speed = if boids.is_empty() {
                0.0
            } else {
                boids.iter().map(|boid| boid.speed()).sum::<f32>() / boids.len() as f32
            };
            let centroid = sim.flock.centroid();
            info!(
                tick,
                centroid = %format!("({:.2}, {:.2}, {:.2})", centroid.x, centroid.y, centroid.z),
                mean_speed = %format!("{mean_speed:.3}"),
                neighbor_checks = stats.mean_neighbor_checks(),
                obstacle_hits = stats.obstacle_hits,
                compute_us = stats.compute_time.as_micros() as u64,
                "flock summary"
            );
        }
    }

    Ok(())
}
