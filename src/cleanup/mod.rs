//! Bad-voxel cleanup by iterative neighbor-orientation voting.
//!
//! Segmentation leaves bad voxels (low confidence/quality, unindexed phase,
//! isolation) at label 0. This pass pulls them into adjacent grains level by
//! level: a bad voxel's *agreement count* is the number of assigned face
//! neighbors whose misorientation to the bad voxel's own stored orientation
//! is below the segmentation tolerance. Acceptance levels run from 6 (all
//! six neighbors agree) downward; at each level the bad list is rescanned in
//! raster order until a full pass resolves nothing, because resolving one
//! voxel can raise the agreement count of a neighbor scanned later.
//!
//! Resolution assigns the majority label among the agreeing neighbors
//! (ties broken toward the smaller label) and marks the voxel good. The
//! floor of the level loop is `max(required_neighbors, 1)`, so a voxel is
//! never assigned with fewer than `required_neighbors` agreeing neighbors,
//! and with `required_neighbors = 0` every bad voxel with at least one
//! agreeing neighbor is eventually resolved.
//!
//! Voxels still unassigned when the loop terminates stay at 0 — partial
//! resolution is valid output, not an error.
//!
//! The misorientation comparison looks the crystal symmetry up through the
//! bad voxel's own phase, mirroring the original pipeline even when that
//! phase is dubious; see [`PhasePolicy`] for the flagged alternative.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grains::GrainTable;
use crate::grid::{VoxelGrid, FACE_NEIGHBOR_COUNT, UNASSIGNED};
use crate::orientation::{misorientation, CrystalSymmetry};

/// Which phase's symmetry table is used when comparing a bad voxel against
/// an assigned neighbor.
///
/// The historical behavior looks up symmetry through the bad voxel's own
/// phase even though bad voxels often carry unreliable phase data; whether
/// that is intentional is an open question upstream, so both readings are
/// offered instead of silently picking one. Either way, a bad voxel with
/// phase 0 falls back to the neighbor's phase (phase 0 has no operator
/// table).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhasePolicy {
    /// Use the bad voxel's stored phase (historical behavior).
    #[default]
    BadVoxel,
    /// Use the assigned neighbor's phase.
    Neighbor,
}

/// Options for the cleanup pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CleanupOptions {
    /// Misorientation below which a neighbor counts as agreeing (radians).
    pub tolerance_rad: f32,
    /// Minimum agreement count a voxel must reach to ever be assigned;
    /// 0..=6, default 6 (most conservative).
    pub required_neighbors: u8,
    pub phase_policy: PhasePolicy,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            tolerance_rad: 5.0f32.to_radians(),
            required_neighbors: 6,
            phase_policy: PhasePolicy::default(),
        }
    }
}

/// Runs the cleanup pass; returns the number of voxels resolved.
///
/// Resolved voxels are added to their grain's voxel count in `table`. Their
/// orientation is left untouched — cleanup-time membership is vote-based,
/// not tolerance-bound, which downstream invariants account for.
pub fn clean_bad_voxels(
    grid: &mut VoxelGrid,
    table: &mut GrainTable,
    phase_symmetries: &[CrystalSymmetry],
    options: &CleanupOptions,
) -> usize {
    let mut bad: Vec<usize> = (0..grid.len())
        .filter(|&idx| grid.labels[idx] == UNASSIGNED)
        .collect();
    let initial_bad = bad.len();
    if bad.is_empty() {
        return 0;
    }

    let floor = options.required_neighbors.max(1) as usize;
    for level in (floor..=FACE_NEIGHBOR_COUNT).rev() {
        loop {
            let mut resolved_this_pass = 0usize;
            // Index-order rescan: resolving a voxel can raise the agreement
            // count of a later one in the same pass.
            let mut remaining = Vec::with_capacity(bad.len());
            for &idx in &bad {
                match try_resolve(grid, phase_symmetries, options, idx, level) {
                    Some(label) => {
                        grid.labels[idx] = label;
                        if let Some(grain) = table.get_mut(label) {
                            grain.voxel_count += 1;
                        }
                        resolved_this_pass += 1;
                    }
                    None => remaining.push(idx),
                }
            }
            bad = remaining;
            if resolved_this_pass == 0 {
                break;
            }
        }
        if bad.is_empty() {
            break;
        }
    }

    let resolved = initial_bad - bad.len();
    debug!(
        "cleanup: resolved {resolved} of {initial_bad} bad voxels ({} remain)",
        bad.len()
    );
    resolved
}

/// Returns the winning label if `idx` reaches `level` agreeing neighbors,
/// else `None`. The winner is the majority label among agreeing neighbors;
/// ties go to the smaller label.
fn try_resolve(
    grid: &VoxelGrid,
    phase_symmetries: &[CrystalSymmetry],
    options: &CleanupOptions,
    idx: usize,
    level: usize,
) -> Option<i32> {
    let mut agreeing = 0usize;
    let mut votes: [(i32, usize); FACE_NEIGHBOR_COUNT] = [(0, 0); FACE_NEIGHBOR_COUNT];
    let mut vote_len = 0usize;

    for neighbor in grid.face_neighbors(idx) {
        let label = grid.labels[neighbor];
        if label == UNASSIGNED {
            continue;
        }
        let phase = match options.phase_policy {
            PhasePolicy::BadVoxel if grid.phases[idx] > 0 => grid.phases[idx],
            _ => grid.phases[neighbor],
        };
        let Some(&symmetry) = phase_symmetries.get(phase as usize) else {
            continue;
        };
        let m = misorientation(&grid.quats[idx], &grid.quats[neighbor], symmetry);
        if m.angle < options.tolerance_rad {
            agreeing += 1;
            let mut found = false;
            for slot in votes.iter_mut().take(vote_len) {
                if slot.0 == label {
                    slot.1 += 1;
                    found = true;
                    break;
                }
            }
            if !found {
                votes[vote_len] = (label, 1);
                vote_len += 1;
            }
        }
    }

    if agreeing < level {
        return None;
    }

    votes[..vote_len]
        .iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|&(label, _)| label)
}
