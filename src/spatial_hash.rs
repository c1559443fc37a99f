/*
 * Spatial Hash Module
 *
 * Assigns every agent to a cell of a grid whose size is the perception radius.
 * The grid gets a fresh random rotation and offset every frame so that cell
 * walls never sit in the same place twice; agents that a fixed grid would keep
 * split across a wall end up sharing a cell on other frames.
 *
 * Cells are identified only by a hash of their integer coordinate. Two cells
 * hashing to the same value are merged, which the flocking rules tolerate.
 *
 * Insertion runs in parallel into a sharded concurrent map.
 */

use dashmap::DashMap;
use glam::{IVec3, Quat, Vec3};
use rand::Rng;
use rayon::prelude::*;

use crate::agent::Agent;
use crate::math;

// Per-frame grid placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellJitter {
    pub rotation: Quat,
    pub offset: Vec3,
    pub cell_radius: f32,
}

impl CellJitter {
    // Unrotated, unshifted grid; handy for tests and debugging
    pub fn fixed(cell_radius: f32) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            offset: Vec3::ZERO,
            cell_radius,
        }
    }

    pub fn sample<R: Rng + ?Sized>(rng: &mut R, cell_radius: f32) -> Self {
        let rotation = math::euler_degrees(
            rng.gen_range(-360.0..=360.0),
            rng.gen_range(-360.0..=360.0),
            rng.gen_range(-360.0..=360.0),
        );

        let offset_range = (cell_radius / 2.0).abs();
        let offset = Vec3::new(
            rng.gen_range(-offset_range..=offset_range),
            rng.gen_range(-offset_range..=offset_range),
            rng.gen_range(-offset_range..=offset_range),
        );

        Self {
            rotation,
            offset,
            cell_radius,
        }
    }

    // floor((R * position + T) / radius)
    #[inline]
    pub fn cell_coord(&self, position: Vec3) -> IVec3 {
        let grid = (self.rotation * position + self.offset) / self.cell_radius;
        IVec3::new(
            grid.x.floor() as i32,
            grid.y.floor() as i32,
            grid.z.floor() as i32,
        )
    }

    #[inline]
    pub fn cell_hash(&self, position: Vec3) -> u32 {
        hash_cell(self.cell_coord(position))
    }
}

// Multiply each lane by a large odd constant, sum, and bias. Wrapping throughout.
#[inline]
pub fn hash_cell(coord: IVec3) -> u32 {
    (coord.x as u32)
        .wrapping_mul(0x4C7F_6DD1)
        .wrapping_add((coord.y as u32).wrapping_mul(0x4822_A3E9))
        .wrapping_add((coord.z as u32).wrapping_mul(0xAAC3_C25D))
        .wrapping_add(0xD21D_0945)
}

// Cell hash -> indices of the agents that landed in that cell
#[derive(Debug, Default)]
pub struct SpatialHashMap {
    cells: DashMap<u32, Vec<usize>>,
}

impl SpatialHashMap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: DashMap::with_capacity(capacity),
        }
    }

    // Safe to call from many threads at once
    #[inline]
    pub fn insert(&self, hash: u32, agent_index: usize) {
        self.cells.entry(hash).or_default().push(agent_index);
    }

    // Hash every agent's live position into a freshly sized map
    pub fn build(agents: &[Agent], jitter: &CellJitter) -> Self {
        let map = Self::with_capacity(agents.len());

        agents.par_iter().enumerate().for_each(|(index, agent)| {
            map.insert(jitter.cell_hash(agent.position), index);
        });

        map
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.value().len()).sum()
    }

    pub fn members(&self, hash: u32) -> Option<Vec<usize>> {
        self.cells.get(&hash).map(|cell| cell.value().clone())
    }

    // Hand the groups over for reduction; the map is gone afterwards
    pub fn into_groups(self) -> impl ParallelIterator<Item = (u32, Vec<usize>)> {
        self.cells.into_par_iter()
    }
}
