/*
 * Force Integrator Module
 *
 * Turns each agent's cell aggregate into a steering force and moves the agent.
 * There is no neighbour loop: an agent's neighbours are "everyone else in my
 * cell", and their averages come straight from the cell sums minus the
 * agent's own contribution.
 *
 * Forces applied:
 * - Separation: away from the neighbours' average position, stronger the
 *   closer that average is (zero once it is a full cell radius away)
 * - Cohesion: toward the neighbours' average position
 * - Alignment: along the neighbours' average heading
 * - Wall avoidance: back toward the cage center once any face is closer than
 *   the avoid distance
 *
 * Agents are processed in parallel chunks. Each agent only writes its own slot.
 */

use glam::Vec3;
use rayon::prelude::*;

use crate::agent::Agent;
use crate::config::SimulationConfig;
use crate::math;
use crate::reducer::{CellAggregate, CellTable};

// Per-frame constants for the integrator, copied out of the config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub delta_time: f32,
    pub speed: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub cell_radius: f32,
    pub cage_half_extent: f32,
    pub avoid_wall_distance: f32,
    pub avoid_wall_weight: f32,
}

impl SteeringParams {
    pub fn from_config(config: &SimulationConfig, delta_time: f32) -> Self {
        Self {
            delta_time,
            speed: config.speed,
            separation_weight: config.separation_weight,
            alignment_weight: config.alignment_weight,
            cohesion_weight: config.cohesion_weight,
            cell_radius: config.perception_radius,
            cage_half_extent: config.cage_half_extent(),
            avoid_wall_distance: config.avoid_wall_distance,
            avoid_wall_weight: config.avoid_wall_weight,
        }
    }
}

// Neighbour statistics with the agent itself removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbourhood {
    pub nearby_count: u32,
    pub position_sum: Vec3,
    pub heading_sum: Vec3,
}

impl Neighbourhood {
    pub fn excluding_self(aggregate: &CellAggregate, position: Vec3, heading: Vec3) -> Self {
        Self {
            nearby_count: aggregate.count.saturating_sub(1),
            position_sum: aggregate.position_sum - position,
            heading_sum: aggregate.heading_sum - heading,
        }
    }
}

pub fn flocking_force(neighbours: &Neighbourhood, position: Vec3, params: &SteeringParams) -> Vec3 {
    if neighbours.nearby_count == 0 {
        return Vec3::ZERO;
    }

    let nearby = neighbours.nearby_count as f32;
    let average_position = neighbours.position_sum / nearby;
    let average_heading = neighbours.heading_sum / nearby;

    let dist_to_average_sq = (average_position - position).length_squared();
    let max_dist_sq = params.cell_radius * params.cell_radius;
    let need_to_separate = (1.0 - dist_to_average_sq / max_dist_sq).max(0.0);

    let towards_average = math::safe_normalize(average_position - position);

    -towards_average * params.separation_weight * need_to_separate
        + towards_average * params.cohesion_weight
        + average_heading * params.alignment_weight
}

// Smallest distance from the position to any of the cage's six faces
#[inline]
pub fn cage_margin(position: Vec3, cage_half_extent: f32) -> f32 {
    let abs = position.abs();
    (cage_half_extent - abs.x)
        .min(cage_half_extent - abs.y)
        .min(cage_half_extent - abs.z)
}

// Steers toward the origin, not away from the nearest face
pub fn wall_avoidance_force(position: Vec3, params: &SteeringParams) -> Vec3 {
    if cage_margin(position, params.cage_half_extent) < params.avoid_wall_distance {
        -math::safe_normalize(position) * params.avoid_wall_weight
    } else {
        Vec3::ZERO
    }
}

// Integrate one agent given its total force
pub fn integrate(agent: &Agent, force: Vec3, params: &SteeringParams) -> Agent {
    let forward = agent.heading();
    let cruise = forward * params.speed;

    let velocity = cruise + force * params.delta_time;
    let direction = math::safe_normalize(velocity);
    let velocity = if direction == Vec3::ZERO {
        cruise
    } else {
        direction * params.speed
    };

    Agent {
        position: agent.position + velocity * params.delta_time,
        rotation: math::look_rotation_or(velocity, agent.up(), agent.rotation),
    }
}

// Full per-agent update. None when the cell lookup fails.
pub fn steer_agent(agent: &Agent, aggregate: Option<CellAggregate>, params: &SteeringParams) -> Option<Agent> {
    let aggregate = aggregate?;
    let neighbours = Neighbourhood::excluding_self(&aggregate, agent.position, agent.heading());

    let force = flocking_force(&neighbours, agent.position, params)
        + wall_avoidance_force(agent.position, params);

    Some(integrate(agent, force, params))
}

// Move every agent using the finished cell table. The table is owned here and
// released when the pass ends. Returns how many agents were left untouched.
pub fn apply_forces(agents: &mut [Agent], cells: CellTable, params: &SteeringParams) -> usize {
    if agents.is_empty() {
        return 0;
    }

    let chunk_size = std::cmp::max(agents.len() / rayon::current_num_threads(), 1);

    let skipped = agents
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let mut skipped = 0usize;
            for (i_in_chunk, agent) in chunk.iter_mut().enumerate() {
                let index = chunk_idx * chunk_size + i_in_chunk;
                match steer_agent(agent, cells.aggregate_for(index), params) {
                    Some(updated) => *agent = updated,
                    None => {
                        log::trace!("Agent {} has no valid cell this frame, leaving it in place", index);
                        skipped += 1;
                    }
                }
            }
            skipped
        })
        .sum();

    drop(cells);
    skipped
}
