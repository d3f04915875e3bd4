use log::debug;

use super::options::SegmentOptions;
use crate::grains::{Grain, GrainTable};
use crate::grid::{VoxelGrid, UNASSIGNED};
use crate::orientation::quat::nearest_equivalent;
use crate::orientation::{misorientation, CrystalSymmetry};

/// Internal sentinel for "eligible but not yet claimed". Converted back to
/// [`UNASSIGNED`] before the pass returns; no other stage ever sees it.
const CANDIDATE: i32 = -1;

pub(super) struct GrainSegmenter<'a> {
    grid: &'a mut VoxelGrid,
    phase_symmetries: &'a [CrystalSymmetry],
    options: &'a SegmentOptions,
    /// Explicit growth frontier; drained FIFO via a cursor so claim order is
    /// deterministic.
    frontier: Vec<usize>,
    table: GrainTable,
}

impl<'a> GrainSegmenter<'a> {
    pub(super) fn new(
        grid: &'a mut VoxelGrid,
        phase_symmetries: &'a [CrystalSymmetry],
        options: &'a SegmentOptions,
    ) -> Self {
        Self {
            grid,
            phase_symmetries,
            options,
            frontier: Vec::with_capacity(1024),
            table: GrainTable::new(),
        }
    }

    pub(super) fn run(mut self) -> GrainTable {
        self.mark_candidates();

        for idx in 0..self.grid.len() {
            if self.grid.labels[idx] == CANDIDATE {
                self.grow_grain(idx);
            }
        }

        // Candidates isolated from every compatible seed stay unassigned.
        for label in self.grid.labels.iter_mut() {
            if *label == CANDIDATE {
                *label = UNASSIGNED;
            }
        }

        debug!(
            "segment: {} grains over {} voxels",
            self.table.grain_count(),
            self.grid.len()
        );
        self.table
    }

    /// Marks every voxel passing the seed thresholds as a growth candidate.
    /// Bad voxels keep [`UNASSIGNED`] and are invisible to growth.
    fn mark_candidates(&mut self) {
        for idx in 0..self.grid.len() {
            let eligible = self.grid.phases[idx] > 0
                && self.grid.confidences[idx] >= self.options.min_seed_confidence
                && self.grid.image_qualities[idx] >= self.options.min_seed_image_quality;
            if eligible {
                self.grid.labels[idx] = CANDIDATE;
            }
        }
    }

    fn grow_grain(&mut self, seed: usize) {
        let phase = self.grid.phases[seed];
        let symmetry = self.phase_symmetries[phase as usize];
        let operators = symmetry.operators();
        let seed_quat = self.grid.quats[seed];

        let mut grain = Grain::new(phase);
        let label = self.table.push(grain.clone());

        self.frontier.clear();
        self.grid.labels[seed] = label;
        self.frontier.push(seed);

        let mut cursor = 0;
        while cursor < self.frontier.len() {
            let current = self.frontier[cursor];
            cursor += 1;

            let current_quat = self.grid.quats[current];
            grain.accumulate_orientation(&nearest_equivalent(
                &seed_quat,
                &current_quat,
                operators,
            ));

            for neighbor in self.grid.face_neighbors(current) {
                if self.grid.labels[neighbor] != CANDIDATE {
                    continue;
                }
                if self.grid.phases[neighbor] != phase {
                    continue;
                }
                let m = misorientation(
                    &current_quat,
                    &self.grid.quats[neighbor],
                    symmetry,
                );
                // Strict `<`: a voxel exactly at tolerance stays out.
                if m.angle < self.options.tolerance_rad {
                    self.grid.labels[neighbor] = label;
                    self.frontier.push(neighbor);
                }
            }
        }

        grain.voxel_count = self.frontier.len();
        if let Some(slot) = self.table.get_mut(label) {
            *slot = grain;
        }
    }
}
