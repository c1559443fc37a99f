/*
 * Agent Snapshot Module
 *
 * Copies every agent's position and heading into two flat, index-aligned
 * arrays at the start of the frame. The reducer later folds cell sums into
 * these same buffers, so the snapshot is consumed rather than borrowed.
 */

use glam::Vec3;
use rayon::prelude::*;

use crate::agent::Agent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentSnapshot {
    pub positions: Vec<Vec3>,
    pub headings: Vec<Vec3>,
}

impl AgentSnapshot {
    pub fn capture(agents: &[Agent]) -> Self {
        let (positions, headings) = agents
            .par_iter()
            .map(|agent| (agent.position, agent.heading()))
            .unzip();

        Self { positions, headings }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
