/*
 * Hash Boids Viewer
 *
 * Opens a window running the flocking simulation. Agents find their
 * neighbours through a randomly rotated and offset spatial hash that is
 * rebuilt every frame, and steer with three rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Usage: hashboids [config.ron]
 * Set RUST_LOG=debug for per-frame statistics.
 */

use hashboids::app::{model, update};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    nannou::app(model).update(update).run();
}
