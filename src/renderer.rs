/*
 * Renderer Module
 *
 * This module handles the rendering of the flock. It draws the cage outline,
 * every agent as a small triangle pointing along its heading, and the debug
 * overlay. Agents are drawn back to front and shaded by depth so the 3D
 * structure of the flock reads on a flat projection.
 */

use nannou::prelude::*;

use crate::agent::Agent;
use crate::app::Model;
use crate::camera::Camera;
use crate::ui;
use crate::AGENT_SIZE;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();

    if let Some(config) = model.driver.config() {
        draw_cage(&draw, &model.camera, config.cage_half_extent(), window_rect);

        let agents = model.driver.flock().agents();
        let depth_range = config.cage_half_extent() * 1.8;

        // Back to front
        let mut order: Vec<(f32, usize)> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| (model.camera.project(agent.position, window_rect).1, i))
            .collect();
        order.sort_by(|a, b| b.0.total_cmp(&a.0));

        for &(depth, i) in &order {
            draw_agent(&draw, &model.camera, &agents[i], depth, depth_range, window_rect);
        }
    }

    if model.params.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, model.camera.zoom);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("Failed to draw frame: {:?}", err);
    }

    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("Failed to draw UI: {:?}", err);
    }
}

// The twelve edges of the cage
fn draw_cage(draw: &Draw, camera: &Camera, half: f32, window_rect: Rect) {
    let corner = |i: usize| {
        ::glam::Vec3::new(
            if i & 1 == 0 { -half } else { half },
            if i & 2 == 0 { -half } else { half },
            if i & 4 == 0 { -half } else { half },
        )
    };

    for a in 0..8usize {
        for bit in [1usize, 2, 4] {
            let b = a | bit;
            if b == a {
                continue;
            }
            let (start, _) = camera.project(corner(a), window_rect);
            let (end, _) = camera.project(corner(b), window_rect);
            draw.line()
                .start(start)
                .end(end)
                .weight(1.0)
                .color(rgba(0.3, 0.3, 0.3, 1.0));
        }
    }
}

fn draw_agent(draw: &Draw, camera: &Camera, agent: &Agent, depth: f32, depth_range: f32, window_rect: Rect) {
    let (base, _) = camera.project(agent.position, window_rect);
    let (ahead, _) = camera.project(agent.position + agent.heading(), window_rect);

    // Heading pointing straight at the viewer still gets a visible triangle
    let delta = ahead - base;
    let dir = if delta.length_squared() > 1.0e-6 {
        delta / delta.length()
    } else {
        Vec2::X
    };
    let side = vec2(-dir.y, dir.x);

    let size = AGENT_SIZE;
    let points = [
        base + dir * size,
        base - dir * size + side * (size / 2.0),
        base - dir * size - side * (size / 2.0),
    ];

    // Near agents bright, far agents dim
    let t = if depth_range > 0.0 {
        ((depth_range - depth) / (2.0 * depth_range)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let brightness = 0.3 + 0.7 * t;

    draw.polygon()
        .color(rgb(brightness * 0.85, brightness * 0.9, brightness))
        .points(points);
}
