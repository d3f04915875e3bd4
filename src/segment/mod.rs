//! Seeded region-growing grain segmenter.
//!
//! This module implements the primary labeling pass of the reconstruction
//! pipeline. The algorithm performs:
//!
//! - Eligibility marking: voxels meeting the seed thresholds (confidence,
//!   image quality, indexed phase) become growth candidates; everything else
//!   is bad data left for the cleanup stage.
//! - Raster-order seeding: the grid is scanned in flat index order (row-major,
//!   planes outermost) and every still-unclaimed candidate starts a new grain
//!   with the next unused positive label. Seed order is the tie-breaker for
//!   contested regions, so it is a hard determinism requirement, not an
//!   implementation detail.
//! - Frontier growth: an explicit work list (never recursion) absorbs
//!   candidate face neighbors of the same phase whose voxel-to-voxel
//!   misorientation is strictly below the tolerance. Claimed voxels are
//!   marked at enqueue time to avoid double growth.
//! - Average-orientation accumulation: each claimed voxel's orientation is
//!   folded into the grain's running quaternion sum as the
//!   symmetry-equivalent nearest to the seed, so grain averages stay inside
//!   one fundamental zone.
//!
//! Voxels never claimed (bad thresholds, unindexed phase, or isolated from
//! every compatible seed) end the pass at [`crate::grid::UNASSIGNED`]; that is a valid
//! output state, not an error.
//!
//! Complexity: every voxel enters the frontier at most once, giving
//! O(N · S) behavior for N voxels and S symmetry operators.

mod options;
mod segmenter;

pub use options::SegmentOptions;

use crate::grains::GrainTable;
use crate::grid::VoxelGrid;
use crate::orientation::CrystalSymmetry;

/// Runs the segmentation pass over `grid`, assigning every eligible voxel a
/// grain label, and returns the table of grains created.
///
/// `phase_symmetries` maps phase id → crystal class; entry 0 is unused.
/// A grid with zero eligible voxels yields an empty table with all labels at
/// [`crate::grid::UNASSIGNED`], which is a valid result.
pub fn segment_grains(
    grid: &mut VoxelGrid,
    phase_symmetries: &[CrystalSymmetry],
    options: &SegmentOptions,
) -> GrainTable {
    segmenter::GrainSegmenter::new(grid, phase_symmetries, options).run()
}

#[cfg(test)]
mod tests;
