/*
 * Simulation Configuration Module
 *
 * This module defines the SimulationConfig struct, the read-only controller
 * record the kernel consults every frame: agent count, speed, perception
 * radius (which doubles as the hash cell size), flocking weights and the
 * cage parameters. It can be loaded from a RON file and provides the value
 * ranges used by the UI sliders.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // Only read when the flock is spawned or respawned
    pub agent_count: usize,
    pub speed: f32,
    pub perception_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    // Full edge length of the cage, centered on the origin
    pub cage_size: f32,
    pub avoid_wall_distance: f32,
    pub avoid_wall_weight: f32,
    // Seed for spawning and per-frame jitter; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_count: 1000,
            speed: 10.0,
            perception_radius: 5.0,
            separation_weight: 1.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            cage_size: 50.0,
            avoid_wall_distance: 5.0,
            avoid_wall_weight: 2.0,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    // Reject values the kernel would divide by or that make the cage meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.perception_radius > 0.0) || !self.perception_radius.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "perception_radius must be positive, got {}",
                self.perception_radius
            )));
        }
        if !(self.cage_size > 0.0) || !self.cage_size.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "cage_size must be positive, got {}",
                self.cage_size
            )));
        }
        if !(self.speed >= 0.0) || !self.speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "speed must be non-negative, got {}",
                self.speed
            )));
        }
        if !(self.avoid_wall_distance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "avoid_wall_distance must be non-negative, got {}",
                self.avoid_wall_distance
            )));
        }

        let weights = [
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("avoid_wall_weight", self.avoid_wall_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn cage_half_extent(&self) -> f32 {
        self.cage_size / 2.0
    }

    // Get parameter ranges for UI sliders
    pub fn agent_count_range() -> std::ops::RangeInclusive<usize> {
        0..=50000
    }

    pub fn speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn perception_radius_range() -> std::ops::RangeInclusive<f32> {
        0.5..=50.0
    }

    pub fn cage_size_range() -> std::ops::RangeInclusive<f32> {
        10.0..=500.0
    }

    pub fn avoid_wall_distance_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = SimulationConfig::from_ron_str("(agent_count: 12, speed: 3.5)").unwrap();
        assert_eq!(config.agent_count, 12);
        assert_eq!(config.speed, 3.5);
        assert_eq!(config.perception_radius, SimulationConfig::default().perception_radius);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn seed_is_read_as_option() {
        let config = SimulationConfig::from_ron_str("(rng_seed: Some(7))").unwrap();
        assert_eq!(config.rng_seed, Some(7));
    }

    #[test]
    fn zero_radius_is_rejected() {
        let err = SimulationConfig::from_ron_str("(perception_radius: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = SimulationConfig::from_ron_str("(agent_count: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationConfig::load("/definitely/not/here/flock.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let config = SimulationConfig {
            cohesion_weight: f32::NAN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
