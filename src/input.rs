/*
 * Input Module
 *
 * This module handles user input events for the viewer.
 *
 * Features:
 * - Camera panning with left drag, orbiting with right drag
 * - Camera zooming with mouse wheel
 * - Space toggles pause, R respawns the flock, C refits the camera
 * - Forwarding raw events to egui, ignoring clicks that land on the UI
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};

use crate::app::Model;

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let new_pos = Vec2::new(pos.x, pos.y);

    if model.camera.is_dragging || model.camera.is_orbiting {
        model.camera.drag(new_pos);
    }

    model.mouse_position = new_pos;
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    match button {
        MouseButton::Left => model.camera.start_drag(model.mouse_position),
        MouseButton::Right => model.camera.start_orbit(model.mouse_position),
        _ => {}
    }
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if matches!(button, MouseButton::Left | MouseButton::Right) {
        model.camera.end_drag();
    }
}

// Mouse wheel event handler for zooming
pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            model.camera.zoom(vec2(x, y), model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            model.camera.zoom(vec2(pos.x as f32, pos.y as f32) * 0.01, model.mouse_position, window_rect);
        }
    }
}

// Keyboard shortcuts
pub fn key_pressed(app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => model.params.pause_simulation = !model.params.pause_simulation,
        Key::R => model.driver.respawn(),
        Key::C => {
            let cage_size = model.params.config.cage_size;
            model.camera.fit(cage_size, app.window_rect());
        }
        _ => {}
    }
}

// Pass events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
