/*
 * Cell Reducer Module
 *
 * Folds every hash group into a single aggregate: the number of agents in the
 * cell plus the sum of their positions and headings. The sums are written
 * into the slot of one member of the group (the representative), reusing the
 * snapshot buffers, and every other member records the representative's index.
 * Any agent can then read its whole cell's statistics with one indirection,
 * which is what replaces the nested neighbour loop.
 *
 * Groups are independent so they are reduced in parallel. Whichever member
 * the map yields first becomes the representative.
 */

use glam::Vec3;
use rayon::prelude::*;

use crate::snapshot::AgentSnapshot;
use crate::spatial_hash::SpatialHashMap;

// Marks a slot no group wrote to
pub const UNASSIGNED: usize = usize::MAX;

// What one agent sees of its cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAggregate {
    pub representative: usize,
    pub count: u32,
    pub position_sum: Vec3,
    pub heading_sum: Vec3,
}

// Result of folding a single group, before it is scattered into the table
#[derive(Debug)]
struct GroupFold {
    representative: usize,
    count: u32,
    position_sum: Vec3,
    heading_sum: Vec3,
    members: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct CellTable {
    // Agent index -> representative index
    pub cell_indices: Vec<usize>,
    // Indexed by representative; zero for every other slot
    pub counts: Vec<u32>,
    pub position_sums: Vec<Vec3>,
    pub heading_sums: Vec<Vec3>,
    cell_count: usize,
}

impl CellTable {
    // Consumes both the snapshot (whose buffers become the sums) and the hash map
    pub fn reduce(snapshot: AgentSnapshot, hash_map: SpatialHashMap) -> Self {
        let agent_count = snapshot.len();
        let AgentSnapshot {
            positions: mut position_sums,
            headings: mut heading_sums,
        } = snapshot;

        let folds: Vec<GroupFold> = {
            let positions = &position_sums;
            let headings = &heading_sums;
            hash_map
                .into_groups()
                .filter_map(|(_, members)| fold_group(members, positions, headings))
                .collect()
        };

        let mut cell_indices = vec![UNASSIGNED; agent_count];
        let mut counts = vec![0u32; agent_count];

        for fold in &folds {
            let rep = fold.representative;
            counts[rep] = fold.count;
            position_sums[rep] = fold.position_sum;
            heading_sums[rep] = fold.heading_sum;
            for &member in &fold.members {
                cell_indices[member] = rep;
            }
        }

        log::trace!("Reduced {} agents into {} cells", agent_count, folds.len());

        Self {
            cell_indices,
            counts,
            position_sums,
            heading_sums,
            cell_count: folds.len(),
        }
    }

    // Assemble a table from prepared buffers; the cell count is derived from them
    #[cfg(test)]
    pub(crate) fn from_parts(
        cell_indices: Vec<usize>,
        counts: Vec<u32>,
        position_sums: Vec<Vec3>,
        heading_sums: Vec<Vec3>,
    ) -> Self {
        let cell_count = cell_indices
            .iter()
            .enumerate()
            .filter(|&(index, &rep)| index == rep && counts.get(index).map_or(false, |&c| c > 0))
            .count();

        Self {
            cell_indices,
            counts,
            position_sums,
            heading_sums,
            cell_count,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cell_indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_indices.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    // Resolve an agent to its cell. None when the index or its back-pointer
    // falls outside the table, or points at a slot that holds no aggregate.
    pub fn aggregate_for(&self, agent_index: usize) -> Option<CellAggregate> {
        let representative = *self.cell_indices.get(agent_index)?;
        if representative >= self.counts.len()
            || representative >= self.position_sums.len()
            || representative >= self.heading_sums.len()
        {
            return None;
        }

        let count = self.counts[representative];
        if count == 0 {
            return None;
        }

        Some(CellAggregate {
            representative,
            count,
            position_sum: self.position_sums[representative],
            heading_sum: self.heading_sums[representative],
        })
    }

    // Representatives, one per non-empty cell
    pub fn representatives(&self) -> impl Iterator<Item = usize> + '_ {
        self.cell_indices
            .iter()
            .enumerate()
            .filter(|&(index, &rep)| index == rep)
            .map(|(index, _)| index)
    }
}

// First member seeds the sums, every later member is added on top
fn fold_group(members: Vec<usize>, positions: &[Vec3], headings: &[Vec3]) -> Option<GroupFold> {
    let (&representative, rest) = members.split_first()?;

    let mut count = 1u32;
    let mut position_sum = positions[representative];
    let mut heading_sum = headings[representative];

    for &member in rest {
        count += 1;
        position_sum += positions[member];
        heading_sum += headings[member];
    }

    Some(GroupFold {
        representative,
        count,
        position_sum,
        heading_sum,
        members,
    })
}
