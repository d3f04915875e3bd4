//! Grain compaction: minimum-size filtering and dense renumbering.
//!
//! Runs after every structural change to the label field (initial
//! segmentation, cleanup, each merge pass). Two steps:
//!
//! 1. Grains whose voxel count is below the configured minimum are retired:
//!    their voxels reset to label 0.
//! 2. Surviving labels are renumbered to the dense range `1..=N`, ordered by
//!    first appearance in raster scan order, and the grain table is rebuilt
//!    to match.
//!
//! The pass is idempotent: running it twice on the same label field yields
//! the identical field and table. A grid with zero live grains compacts to
//! "no grains", which is valid.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grains::{Grain, GrainTable};
use crate::grid::{VoxelGrid, UNASSIGNED};

/// Options for the compaction pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CompactOptions {
    /// Grains smaller than this many voxels are removed; 0 disables the
    /// size filter.
    pub min_allowed_grain_size: usize,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            min_allowed_grain_size: 0,
        }
    }
}

/// Outcome counters of one compaction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompactStats {
    pub live_grains: usize,
    pub removed_grains: usize,
    pub freed_voxels: usize,
}

/// Removes undersized grains, renumbers the survivors densely and returns
/// the rebuilt grain table with pass statistics.
///
/// Afterwards `max(label) == count(distinct nonzero labels)` and every
/// nonzero voxel label references a live grain.
pub fn compact_grains(
    grid: &mut VoxelGrid,
    table: &GrainTable,
    options: &CompactOptions,
) -> (GrainTable, CompactStats) {
    let mut stats = CompactStats::default();

    // Step 1: retire grains below the size threshold.
    let mut retired = vec![false; table.grain_count() + 1];
    if options.min_allowed_grain_size > 0 {
        for (label, grain) in table.iter() {
            if grain.voxel_count < options.min_allowed_grain_size {
                retired[label as usize] = true;
                stats.removed_grains += 1;
            }
        }
    }
    if stats.removed_grains > 0 {
        for label in grid.labels.iter_mut() {
            if *label > 0 && retired[*label as usize] {
                *label = UNASSIGNED;
                stats.freed_voxels += 1;
            }
        }
    }

    // Step 2: dense renumbering by first appearance in scan order.
    let mut remap = vec![UNASSIGNED; table.grain_count() + 1];
    let mut new_table = GrainTable::new();
    for idx in 0..grid.len() {
        let old = grid.labels[idx];
        if old == UNASSIGNED {
            continue;
        }
        let slot = &mut remap[old as usize];
        if *slot == UNASSIGNED {
            let mut grain = table
                .get(old)
                .cloned()
                .unwrap_or_else(|| Grain::new(grid.phases[idx]));
            grain.voxel_count = 0;
            *slot = new_table.push(grain);
        }
        let new = *slot;
        grid.labels[idx] = new;
        if let Some(grain) = new_table.get_mut(new) {
            grain.voxel_count += 1;
        }
    }

    stats.live_grains = new_table.grain_count();
    debug!(
        "compact: {} live grains, {} removed, {} voxels freed",
        stats.live_grains, stats.removed_grains, stats.freed_voxels
    );
    (new_table, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grains::Grain;

    /// Builds a 1-D grid with the given labels and a matching table.
    fn grid_with_labels(labels: &[i32]) -> (VoxelGrid, GrainTable) {
        let mut grid = VoxelGrid::new(labels.len(), 1, 1);
        let max = labels.iter().copied().max().unwrap_or(0);
        let mut table = GrainTable::new();
        for _ in 0..max {
            table.push(Grain::new(1));
        }
        for (idx, &label) in labels.iter().enumerate() {
            grid.labels[idx] = label;
            grid.phases[idx] = 1;
            if let Some(grain) = table.get_mut(label) {
                grain.voxel_count += 1;
            }
        }
        (grid, table)
    }

    #[test]
    fn renumbers_holes_to_dense_range() {
        let (mut grid, table) = grid_with_labels(&[5, 5, 9, 2, 9]);
        let (new_table, stats) = compact_grains(&mut grid, &table, &CompactOptions::default());
        // First appearance order: 5 → 1, 9 → 2, 2 → 3.
        assert_eq!(grid.labels, vec![1, 1, 2, 3, 2]);
        assert_eq!(new_table.grain_count(), 3);
        assert_eq!(stats.live_grains, 3);
        assert_eq!(stats.removed_grains, 0);
    }

    #[test]
    fn size_filter_frees_small_grains() {
        let (mut grid, table) = grid_with_labels(&[1, 1, 1, 2, 1, 1]);
        let options = CompactOptions {
            min_allowed_grain_size: 2,
        };
        let (new_table, stats) = compact_grains(&mut grid, &table, &options);
        assert_eq!(grid.labels, vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(new_table.grain_count(), 1);
        assert_eq!(stats.removed_grains, 1);
        assert_eq!(stats.freed_voxels, 1);
        assert_eq!(new_table.get(1).map(|g| g.voxel_count), Some(5));
    }

    #[test]
    fn compaction_is_idempotent() {
        let (mut grid, table) = grid_with_labels(&[3, 0, 7, 3, 0, 7, 7]);
        let options = CompactOptions {
            min_allowed_grain_size: 2,
        };
        let (table_once, _) = compact_grains(&mut grid, &table, &options);
        let labels_once = grid.labels.clone();
        let (table_twice, stats) = compact_grains(&mut grid, &table_once, &options);
        assert_eq!(grid.labels, labels_once);
        assert_eq!(table_twice.grain_count(), table_once.grain_count());
        assert_eq!(stats.removed_grains, 0);
    }

    #[test]
    fn zero_live_grains_is_valid() {
        let (mut grid, table) = grid_with_labels(&[1]);
        let options = CompactOptions {
            min_allowed_grain_size: 10,
        };
        let (new_table, stats) = compact_grains(&mut grid, &table, &options);
        assert_eq!(new_table.grain_count(), 0);
        assert_eq!(stats.live_grains, 0);
        assert_eq!(grid.labels, vec![0]);
    }
}
