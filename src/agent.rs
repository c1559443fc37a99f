/*
 * Agent Module
 *
 * This module defines the Agent struct and the Flock that owns every live
 * agent. The flock is a dense array: an agent's position in it is its index
 * for the whole frame, and membership is simply being in the array.
 *
 * Agents are spawned at random positions inside the cage with random
 * orientations. After that only the integrator writes their transforms.
 */

use glam::{Quat, Vec3};
use rand::Rng;

use crate::config::SimulationConfig;
use crate::math;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Agent {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    // Random position inside the cage, random orientation
    pub fn random<R: Rng + ?Sized>(rng: &mut R, cage_half_extent: f32) -> Self {
        let position = if cage_half_extent > 0.0 {
            Vec3::new(
                rng.gen_range(-cage_half_extent..cage_half_extent),
                rng.gen_range(-cage_half_extent..cage_half_extent),
                rng.gen_range(-cage_half_extent..cage_half_extent),
            )
        } else {
            Vec3::ZERO
        };

        let rotation = math::euler_degrees(
            rng.gen_range(-360.0..360.0),
            rng.gen_range(-360.0..360.0),
            rng.gen_range(-360.0..360.0),
        );

        Self { position, rotation }
    }

    #[inline]
    pub fn heading(&self) -> Vec3 {
        math::forward(self.rotation)
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        math::up(self.rotation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Flock {
    agents: Vec<Agent>,
}

impl Flock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn spawn<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let half = config.cage_half_extent();
        let agents = (0..config.agent_count)
            .map(|_| Agent::random(rng, half))
            .collect();
        Self { agents }
    }

    // Grow or shrink to `count`; survivors keep their transforms
    pub fn resize<R: Rng + ?Sized>(&mut self, count: usize, cage_half_extent: f32, rng: &mut R) {
        if count <= self.agents.len() {
            self.agents.truncate(count);
        } else {
            let missing = count - self.agents.len();
            self.agents.reserve(missing);
            for _ in 0..missing {
                self.agents.push(Agent::random(rng, cage_half_extent));
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawned_agents_start_inside_the_cage() {
        let config = SimulationConfig {
            agent_count: 256,
            cage_size: 20.0,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let flock = Flock::spawn(&config, &mut rng);

        assert_eq!(flock.len(), 256);
        for agent in flock.agents() {
            assert!(agent.position.abs().max_element() <= 10.0);
            assert!((agent.heading().length() - 1.0).abs() < 1.0e-4);
        }
    }

    #[test]
    fn resize_keeps_existing_agents() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut flock = Flock::spawn(
            &SimulationConfig {
                agent_count: 4,
                ..SimulationConfig::default()
            },
            &mut rng,
        );
        let first = flock.agents()[0];

        flock.resize(10, 25.0, &mut rng);
        assert_eq!(flock.len(), 10);
        assert_eq!(flock.agents()[0], first);

        flock.resize(2, 25.0, &mut rng);
        assert_eq!(flock.len(), 2);
        assert_eq!(flock.agents()[0], first);
    }

    #[test]
    fn identity_rotation_heads_along_z() {
        let agent = Agent::new(Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(agent.heading(), Vec3::Z);
        assert_eq!(agent.up(), Vec3::Y);
    }
}
