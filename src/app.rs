/*
 * Application Module
 *
 * This module defines the main application model for the flocking viewer.
 * It owns the simulation driver, feeds UI edits into it, and steps it on a
 * fixed timestep independent of the render rate.
 *
 * The config comes from the RON file named by the first command-line argument,
 * or from the defaults when no argument is given. A file that cannot be loaded
 * leaves the driver disabled; the window still opens and says so.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::config::SimulationConfig;
use crate::debug::DebugInfo;
use crate::driver::SimulationDriver;
use crate::input;
use crate::params::ViewerParams;
use crate::renderer;
use crate::ui;

// Upper bound on catch-up steps after a long frame
const MAX_PHYSICS_STEPS_PER_FRAME: usize = 5;

// Main model for the application
pub struct Model {
    pub driver: SimulationDriver,
    pub params: ViewerParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Config named on the command line, defaults otherwise
fn initial_config() -> Option<SimulationConfig> {
    match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("Could not load config {}: {}", path, err);
                None
            }
        },
        None => {
            log::info!("No config file given, using defaults");
            Some(SimulationConfig::default())
        }
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let monitor_size = app
        .primary_monitor()
        .map(|monitor| monitor.size())
        .map(|size| (size.width as f32 * 0.8, size.height as f32 * 0.8))
        .unwrap_or((1280.0, 800.0));

    let window_id = app
        .new_window()
        .title("Hash Boids")
        .size(monitor_size.0 as u32, monitor_size.1 as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .expect("Failed to build the main window");

    let window = app.window(window_id).expect("Main window closed during setup");
    let egui = Egui::from_window(&window);

    let config = initial_config();
    let (driver, _) = SimulationDriver::start(config);
    let params = ViewerParams::new(driver.config().copied().unwrap_or_default());

    let mut camera = Camera::new();
    camera.fit(params.config.cage_size, window.rect());

    let physics_step_size = Duration::from_secs_f32(1.0 / params.fixed_physics_fps);

    Model {
        driver,
        params,
        egui,
        debug_info: DebugInfo::default(),
        camera,
        mouse_position: Vec2::ZERO,
        physics_accumulator: Duration::ZERO,
        physics_step_size,
        last_update_time: Instant::now(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let response = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &model.debug_info,
        model.driver.is_enabled(),
    );

    apply_ui_response(app, model, response);

    let current_time = Instant::now();
    let frame_time = current_time.duration_since(model.last_update_time);
    model.last_update_time = current_time;

    if model.params.pause_simulation {
        model.physics_accumulator = Duration::ZERO;
        model.debug_info.physics_updates_per_frame = 0;
        return;
    }

    model.physics_accumulator += frame_time;

    let mut physics_updates_this_frame = 0;
    let dt = model.physics_step_size.as_secs_f32();
    while model.physics_accumulator >= model.physics_step_size {
        let outcome = model.driver.step(dt);
        model.debug_info.record(&outcome);

        model.physics_accumulator -= model.physics_step_size;
        physics_updates_this_frame += 1;

        if physics_updates_this_frame >= MAX_PHYSICS_STEPS_PER_FRAME {
            // Drop the backlog instead of spiralling
            model.physics_accumulator = Duration::ZERO;
            break;
        }
    }

    model.debug_info.physics_updates_per_frame = physics_updates_this_frame;
}

fn apply_ui_response(app: &App, model: &mut Model, response: ui::UiResponse) {
    let changes = response.changes;

    if changes.ui_changed {
        model.physics_step_size = Duration::from_secs_f32(1.0 / model.params.fixed_physics_fps);
    }

    if changes.config_changed && model.driver.is_enabled() {
        if let Err(err) = model.driver.update_config(model.params.config) {
            log::warn!("Ignoring UI config change: {}", err);
        }
    }

    if response.reset_flock || changes.agent_count_changed {
        model.driver.respawn();
    }

    if response.reset_camera {
        model.camera.fit(model.params.config.cage_size, app.window_rect());
    }
}
