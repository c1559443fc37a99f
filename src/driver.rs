/*
 * Simulation Driver Module
 *
 * Runs one frame of the flocking pipeline:
 *
 *   snapshot ─┐
 *             ├─> reduce cells ─> apply forces ─> FrameReport
 *   hash    ──┘
 *
 * Snapshot and hashing only read the flock, so they run side by side. Each
 * later stage takes the previous stages' outputs by value, which is what
 * orders them: a stage cannot start without the finished result of the one
 * before it, and each transient buffer is dropped by the stage that consumes
 * it.
 *
 * A driver started without a usable configuration stays disabled for the
 * whole run. An empty flock skips the frame without allocating anything.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::Flock;
use crate::config::SimulationConfig;
use crate::error::StartError;
use crate::integrator::{self, SteeringParams};
use crate::reducer::CellTable;
use crate::snapshot::AgentSnapshot;
use crate::spatial_hash::{CellJitter, SpatialHashMap};

// Completion token for a finished frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub agent_count: usize,
    pub cell_count: usize,
    pub skipped_agents: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    EmptyPopulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Completed(FrameReport),
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn report(&self) -> Option<&FrameReport> {
        match self {
            FrameOutcome::Completed(report) => Some(report),
            FrameOutcome::Skipped(_) => None,
        }
    }
}

pub struct SimulationDriver {
    config: Option<SimulationConfig>,
    flock: Flock,
    rng: StdRng,
    frame: u64,
}

impl SimulationDriver {
    // Validate the configuration and spawn the flock. Any problem leaves the
    // driver disabled; the error is logged and returned alongside it.
    pub fn start(config: Option<SimulationConfig>) -> (Self, Option<StartError>) {
        match Self::try_start(config) {
            Ok(driver) => (driver, None),
            Err(err) => {
                log::error!("Flocking simulation disabled: {}", err);
                (Self::disabled(), Some(err))
            }
        }
    }

    pub fn try_start(config: Option<SimulationConfig>) -> Result<Self, StartError> {
        let config = config.ok_or(StartError::MissingConfiguration)?;
        config.validate()?;

        let mut rng = make_rng(config.rng_seed);
        let flock = Flock::spawn(&config, &mut rng);
        log::info!(
            "Spawned {} agents in a cage of size {:.1}",
            flock.len(),
            config.cage_size
        );

        Ok(Self {
            config: Some(config),
            flock,
            rng,
            frame: 0,
        })
    }

    // Run with an existing population instead of spawning one
    pub fn with_flock(config: SimulationConfig, flock: Flock) -> Result<Self, StartError> {
        config.validate()?;
        Ok(Self {
            rng: make_rng(config.rng_seed),
            config: Some(config),
            flock,
            frame: 0,
        })
    }

    pub fn disabled() -> Self {
        Self {
            config: None,
            flock: Flock::new(),
            rng: StdRng::from_entropy(),
            frame: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    // Swap in new parameters between frames. Rejected configs leave the old one in place.
    pub fn update_config(&mut self, config: SimulationConfig) -> Result<(), StartError> {
        if !self.is_enabled() {
            return Err(StartError::MissingConfiguration);
        }
        config.validate()?;
        self.config = Some(config);
        Ok(())
    }

    // Throw the flock away and spawn `agent_count` fresh agents
    pub fn respawn(&mut self) {
        if let Some(config) = &self.config {
            self.flock = Flock::spawn(config, &mut self.rng);
            log::info!("Respawned {} agents", self.flock.len());
        }
    }

    // Match the flock size to `agent_count`, keeping existing agents
    pub fn resize_to_config(&mut self) {
        if let Some(config) = &self.config {
            let before = self.flock.len();
            self.flock
                .resize(config.agent_count, config.cage_half_extent(), &mut self.rng);
            log::info!("Resized flock from {} to {} agents", before, self.flock.len());
        }
    }

    pub fn step(&mut self, delta_time: f32) -> FrameOutcome {
        let Some(config) = self.config else {
            return FrameOutcome::Skipped(SkipReason::Disabled);
        };

        let agent_count = self.flock.len();
        if agent_count == 0 {
            log::warn!("Agent count is 0, skipping frame");
            return FrameOutcome::Skipped(SkipReason::EmptyPopulation);
        }

        // Fresh grid placement every frame
        let jitter = CellJitter::sample(&mut self.rng, config.perception_radius);

        // Both read the same untouched flock
        let agents = self.flock.agents();
        let (snapshot, hash_map) = rayon::join(
            || AgentSnapshot::capture(agents),
            || SpatialHashMap::build(agents, &jitter),
        );

        // Consumes the snapshot and releases the hash map
        let cells = CellTable::reduce(snapshot, hash_map);
        let cell_count = cells.cell_count();

        // Consumes and releases the cell table
        let params = SteeringParams::from_config(&config, delta_time);
        let skipped_agents = integrator::apply_forces(self.flock.agents_mut(), cells, &params);

        if skipped_agents > 0 {
            log::warn!(
                "Frame {}: {} of {} agents had no valid cell and were left in place",
                self.frame,
                skipped_agents,
                agent_count
            );
        }

        let report = FrameReport {
            frame: self.frame,
            agent_count,
            cell_count,
            skipped_agents,
        };
        log::debug!(
            "Frame {}: {} agents in {} cells",
            report.frame,
            report.agent_count,
            report.cell_count
        );

        self.frame += 1;
        FrameOutcome::Completed(report)
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use glam::{Quat, Vec3};

    fn seeded(agent_count: usize) -> SimulationConfig {
        SimulationConfig {
            agent_count,
            rng_seed: Some(11),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn missing_config_disables_the_driver() {
        let (mut driver, err) = SimulationDriver::start(None);
        assert!(matches!(err, Some(StartError::MissingConfiguration)));
        assert!(!driver.is_enabled());
        assert_eq!(driver.step(0.1), FrameOutcome::Skipped(SkipReason::Disabled));
        assert_eq!(driver.frame(), 0);
    }

    #[test]
    fn invalid_config_disables_the_driver() {
        let config = SimulationConfig {
            perception_radius: -1.0,
            ..seeded(10)
        };
        let (driver, err) = SimulationDriver::start(Some(config));
        assert!(matches!(err, Some(StartError::InvalidConfiguration(_))));
        assert!(!driver.is_enabled());
        assert!(driver.flock().is_empty());
    }

    #[test]
    fn start_spawns_the_configured_population() {
        let driver = SimulationDriver::try_start(Some(seeded(64))).unwrap();
        assert_eq!(driver.flock().len(), 64);
        assert!(driver.is_enabled());
    }

    #[test]
    fn empty_population_skips_without_touching_state() {
        let mut driver = SimulationDriver::try_start(Some(seeded(0))).unwrap();
        assert_eq!(driver.step(0.1), FrameOutcome::Skipped(SkipReason::EmptyPopulation));
        assert_eq!(driver.frame(), 0);
        assert!(driver.flock().is_empty());

        // Self-heals once agents appear
        driver
            .flock_mut()
            .resize(3, 10.0, &mut StdRng::seed_from_u64(1));
        let outcome = driver.step(0.1);
        assert_eq!(outcome.report().map(|r| r.agent_count), Some(3));
        assert_eq!(driver.frame(), 1);
    }

    #[test]
    fn completed_frame_reports_counts_and_advances() {
        let mut driver = SimulationDriver::try_start(Some(seeded(500))).unwrap();
        let report = *driver.step(1.0 / 60.0).report().unwrap();
        assert_eq!(report.frame, 0);
        assert_eq!(report.agent_count, 500);
        assert_eq!(report.skipped_agents, 0);
        assert!(report.cell_count >= 1 && report.cell_count <= 500);

        let next = *driver.step(1.0 / 60.0).report().unwrap();
        assert_eq!(next.frame, 1);
    }

    #[test]
    fn every_agent_moves_at_configured_speed() {
        let config = seeded(200);
        let mut driver = SimulationDriver::try_start(Some(config)).unwrap();
        let before: Vec<Agent> = driver.flock().agents().to_vec();
        let dt = 0.05;

        driver.step(dt);

        for (old, new) in before.iter().zip(driver.flock().agents()) {
            let travelled = (new.position - old.position).length();
            assert!((travelled - config.speed * dt).abs() < 1.0e-3);
        }
    }

    #[test]
    fn rejected_update_keeps_previous_config() {
        let mut driver = SimulationDriver::try_start(Some(seeded(5))).unwrap();
        let bad = SimulationConfig {
            cage_size: 0.0,
            ..seeded(5)
        };
        assert!(driver.update_config(bad).is_err());
        assert_eq!(driver.config().map(|c| c.cage_size), Some(50.0));

        let good = SimulationConfig {
            speed: 2.0,
            ..seeded(5)
        };
        driver.update_config(good).unwrap();
        assert_eq!(driver.config().map(|c| c.speed), Some(2.0));
    }

    #[test]
    fn resize_and_respawn_follow_agent_count() {
        let mut driver = SimulationDriver::try_start(Some(seeded(10))).unwrap();
        let first = driver.flock().agents()[0];

        driver.update_config(seeded(25)).unwrap();
        driver.resize_to_config();
        assert_eq!(driver.flock().len(), 25);
        assert_eq!(driver.flock().agents()[0], first);

        driver.update_config(seeded(4)).unwrap();
        driver.respawn();
        assert_eq!(driver.flock().len(), 4);
    }

    #[test]
    fn with_flock_runs_a_given_population() {
        let flock = Flock::from_agents(vec![Agent::new(Vec3::ZERO, Quat::IDENTITY)]);
        let mut driver = SimulationDriver::with_flock(seeded(1), flock).unwrap();
        let report = *driver.step(0.1).report().unwrap();
        assert_eq!(report.cell_count, 1);
        assert!((driver.flock().agents()[0].position - Vec3::new(0.0, 0.0, 1.0)).length() < 1.0e-5);
    }
}
