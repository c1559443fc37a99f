/*
 * Hash Boids - Module Definitions
 *
 * This file defines the module structure for the flocking simulation.
 * The kernel (agent, snapshot, spatial_hash, reducer, integrator, driver)
 * is headless and can be driven without a window. The viewer modules
 * (params, debug, camera, ui, renderer, input, app) wrap it in a nannou app.
 */

// Re-export key components for easier access
pub use agent::{Agent, Flock};
pub use config::SimulationConfig;
pub use driver::{FrameOutcome, FrameReport, SimulationDriver, SkipReason};
pub use error::{ConfigError, StartError};
pub use reducer::{CellAggregate, CellTable};
pub use snapshot::AgentSnapshot;
pub use spatial_hash::{CellJitter, SpatialHashMap};

// Simulation kernel
pub mod agent;
pub mod config;
pub mod driver;
pub mod error;
pub mod integrator;
pub mod math;
pub mod reducer;
pub mod snapshot;
pub mod spatial_hash;

// Viewer
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod params;
pub mod renderer;
pub mod ui;

// Constants
pub const AGENT_SIZE: f32 = 6.0;
