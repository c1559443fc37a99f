/*
 * Camera Module
 *
 * This module defines the Camera struct that handles orbiting, zooming and
 * panning around the cage. The world is rotated by the camera's yaw and pitch
 * and then projected orthographically onto the screen; pan and zoom act on
 * that projected plane.
 */

use nannou::prelude::*;

pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub is_orbiting: bool,
    pub last_cursor_pos: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 8.0,
            yaw: 0.6,
            pitch: 0.35,
            min_zoom: 0.1,
            max_zoom: 100.0,
            is_dragging: false,
            is_orbiting: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    // Frame the whole cage in the window
    pub fn fit(&mut self, cage_size: f32, window_rect: Rect) {
        let extent = window_rect.w().min(window_rect.h());
        // The cage diagonal is ~1.73x its edge
        self.zoom = (extent / (cage_size * 1.8)).clamp(self.min_zoom, self.max_zoom);
        self.position = Vec2::ZERO;
    }

    fn view_rotation(&self) -> ::glam::Quat {
        ::glam::Quat::from_rotation_x(self.pitch) * ::glam::Quat::from_rotation_y(self.yaw)
    }

    // World point -> (screen point, depth). Larger depth is farther away.
    pub fn project(&self, point: ::glam::Vec3, window_rect: Rect) -> (Vec2, f32) {
        let view = self.view_rotation() * point;
        let plane = vec2(view.x, view.y);
        ((plane - self.position) * self.zoom + window_rect.xy(), view.z)
    }

    // Convert a point from screen space to the projected plane
    pub fn screen_to_plane(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        let centered = point - window_rect.xy();
        centered / self.zoom + self.position
    }

    // Handle mouse wheel events for zooming, keeping the point under the cursor fixed
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;

        let cursor_before = self.screen_to_plane(cursor_position, window_rect);
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);
        let cursor_after = self.screen_to_plane(cursor_position, window_rect);

        self.position += cursor_before - cursor_after;
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    pub fn start_orbit(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_orbiting = true;
    }

    // Pan or orbit depending on which drag is active
    pub fn drag(&mut self, position: Vec2) {
        let delta = position - self.last_cursor_pos;
        if delta.length_squared() == 0.0 {
            return;
        }

        if self.is_dragging {
            self.position -= delta / self.zoom;
        } else if self.is_orbiting {
            self.yaw += delta.x * 0.01;
            self.pitch = (self.pitch - delta.y * 0.01).clamp(-1.5, 1.5);
        }
        self.last_cursor_pos = position;
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
        self.is_orbiting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn origin_projects_to_window_center() {
        let camera = Camera::new();
        let (screen, depth) = camera.project(::glam::Vec3::ZERO, window());
        assert!(screen.length() < 1.0e-4);
        assert!(depth.abs() < 1.0e-6);
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let mut camera = Camera::new();
        let cursor = vec2(120.0, -40.0);
        let before = camera.screen_to_plane(cursor, window());
        camera.zoom(vec2(0.0, 2.0), cursor, window());
        let after = camera.screen_to_plane(cursor, window());
        assert!((before - after).length() < 1.0e-3);
    }

    #[test]
    fn pitch_is_clamped_while_orbiting() {
        let mut camera = Camera::new();
        camera.start_orbit(Vec2::ZERO);
        camera.drag(vec2(0.0, -10_000.0));
        assert!(camera.pitch <= 1.5);
        camera.end_drag();
        assert!(!camera.is_orbiting);
    }
}
