/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for the flocking config and the
 * viewer, and draws the debug overlay.
 */

use nannou_egui::{egui, Egui};

use crate::config::SimulationConfig;
use crate::debug::DebugInfo;
use crate::params::{ParamChanges, ViewerParams};

// Everything the app needs to react to after this UI frame
#[derive(Debug, Clone, Copy, Default)]
pub struct UiResponse {
    pub reset_flock: bool,
    pub reset_camera: bool,
    pub changes: ParamChanges,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut ViewerParams,
    debug_info: &DebugInfo,
    simulation_enabled: bool,
) -> UiResponse {
    let mut response = UiResponse::default();

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            if !simulation_enabled {
                ui.label("Simulation disabled: no usable configuration was loaded.");
                ui.separator();
            }

            let config = &mut params.config;

            ui.collapsing("Flock", |ui| {
                ui.add(egui::Slider::new(&mut config.agent_count, SimulationConfig::agent_count_range()).text("Agents"));
                ui.add(egui::Slider::new(&mut config.speed, SimulationConfig::speed_range()).text("Speed"));
                ui.add(egui::Slider::new(&mut config.perception_radius, SimulationConfig::perception_radius_range()).text("Perception Radius"));

                if ui.button("Respawn Flock").clicked() {
                    response.reset_flock = true;
                }
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut config.separation_weight, SimulationConfig::weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut config.alignment_weight, SimulationConfig::weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut config.cohesion_weight, SimulationConfig::weight_range()).text("Cohesion Weight"));
            });

            ui.collapsing("Cage", |ui| {
                ui.add(egui::Slider::new(&mut config.cage_size, SimulationConfig::cage_size_range()).text("Cage Size"));
                ui.add(egui::Slider::new(&mut config.avoid_wall_distance, SimulationConfig::avoid_wall_distance_range()).text("Wall Avoid Distance"));
                ui.add(egui::Slider::new(&mut config.avoid_wall_weight, SimulationConfig::weight_range()).text("Wall Avoid Weight"));
            });

            ui.collapsing("Camera Controls", |ui| {
                ui.label("Zoom: mouse wheel");
                ui.label("Pan: left drag");
                ui.label("Orbit: right drag");
                if ui.button("Reset Camera").clicked() {
                    response.reset_camera = true;
                }
            });

            ui.collapsing("Performance", |ui| {
                ui.add(egui::Slider::new(&mut params.fixed_physics_fps, ViewerParams::physics_fps_range()).text("Physics FPS"));

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Physics steps this frame: {}", debug_info.physics_updates_per_frame));
                if let Some(report) = debug_info.last_report {
                    ui.label(format!("Agents: {}", report.agent_count));
                    ui.label(format!("Cells: {}", report.cell_count));
                }
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    response.changes = params.detect_changes();
    response
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect, camera_zoom: f32) {
    let margin = 20.0;
    let line_height = 20.0;

    let report_lines = match debug_info.last_report {
        Some(report) => vec![
            format!("Frame: {}", report.frame),
            format!("Agents: {}", report.agent_count),
            format!("Cells: {}", report.cell_count),
            format!("Skipped agents: {}", report.skipped_agents),
        ],
        None => vec!["No frame simulated yet".to_string()],
    };

    let mut debug_texts = vec![
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
    ];
    debug_texts.extend(report_lines);
    if let Some(occupancy) = debug_info.mean_cell_occupancy() {
        debug_texts.push(format!("Agents per cell: {:.2}", occupancy));
    }
    debug_texts.push(format!("Empty frames: {}", debug_info.empty_frames));
    debug_texts.push(format!("Zoom: {:.2}x", camera_zoom));

    let panel_width = 220.0;
    let panel_height = line_height * debug_texts.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
