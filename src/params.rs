/*
 * Viewer Parameters Module
 *
 * This module defines the ViewerParams struct: the simulation config as edited
 * through the UI plus the viewer-only switches (pause, debug overlay, physics
 * rate). It also provides parameter change detection so the app knows when to
 * push a new config into the driver or resize the flock.
 */

use crate::config::SimulationConfig;

pub struct ViewerParams {
    pub config: SimulationConfig,
    pub show_debug: bool,
    pub pause_simulation: bool,
    pub fixed_physics_fps: f32,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Clone, Copy, PartialEq)]
struct ParamSnapshot {
    config: SimulationConfig,
    show_debug: bool,
    pause_simulation: bool,
    fixed_physics_fps: f32,
}

// What moved since the last snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub agent_count_changed: bool,
    pub config_changed: bool,
    pub ui_changed: bool,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl ViewerParams {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            show_debug: false,
            pause_simulation: false,
            fixed_physics_fps: 60.0,
            previous_values: None,
        }
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            config: self.config,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
            fixed_physics_fps: self.fixed_physics_fps,
        }
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    // Compare against the last snapshot; nothing has changed if there is none
    pub fn detect_changes(&self) -> ParamChanges {
        let Some(prev) = &self.previous_values else {
            return ParamChanges::default();
        };

        let agent_count_changed = self.config.agent_count != prev.config.agent_count;
        let config_changed = self.config != prev.config;
        let ui_changed = *prev != self.snapshot();

        ParamChanges {
            agent_count_changed,
            config_changed,
            ui_changed,
        }
    }

    pub fn physics_fps_range() -> std::ops::RangeInclusive<f32> {
        10.0..=240.0
    }
}
