//! Pipeline orchestrating end-to-end grain reconstruction.
//!
//! The [`Reconstructor`] exposes a simple API: feed a populated voxel grid
//! and get back the labeled grid plus a [`ReconResult`] with counters,
//! timing and the final neighbor graph. Internally it coordinates
//! segmentation, bad-voxel cleanup, compaction, the optional twin/colony
//! merge passes, contained-grain absorption and the final graph build.
//!
//! Typical usage:
//! ```no_run
//! use grain_recon::prelude::*;
//!
//! # fn example(mut grid: VoxelGrid) -> Result<(), grain_recon::ReconError> {
//! let recon = Reconstructor::new(ReconParams::default());
//! let result = recon.run(&mut grid, &mut NoProgress)?;
//! println!("{} grains", result.grain_count);
//! # Ok(())
//! # }
//! ```

use std::time::Instant;

use log::debug;

use super::params::ReconParams;
use super::progress::ProgressSink;
use crate::cleanup::clean_bad_voxels;
use crate::error::ReconError;
use crate::grains::GrainTable;
use crate::graph::NeighborGraph;
use crate::grid::{VoxelGrid, UNASSIGNED};
use crate::merge::{
    apply_merges, find_colony_merges, find_contained_merges, find_twin_merges, MergeDecision,
};
use crate::relabel::compact_grains;
use crate::segment::segment_grains;
use crate::types::ReconResult;

/// Reconstruction pipeline bound to one parameter set. Reusable across
/// grids; each [`Reconstructor::run`] starts from a cleared label field.
pub struct Reconstructor {
    params: ReconParams,
}

impl Reconstructor {
    pub fn new(params: ReconParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ReconParams {
        &self.params
    }

    /// Runs the full pipeline over `grid`.
    ///
    /// Cancellation is polled at stage boundaries only; a cancelled run
    /// returns `Ok` with `cancelled = true` and the labels compacted up to
    /// the last completed stage.
    pub fn run(
        &self,
        grid: &mut VoxelGrid,
        progress: &mut dyn ProgressSink,
    ) -> Result<ReconResult, ReconError> {
        self.params.validate(grid)?;
        let total_start = Instant::now();
        let mut result = ReconResult::default();
        grid.clear_labels();

        let mut table = self.timed(&mut result, "segment", || {
            segment_grains(grid, &self.params.phase_symmetries, &self.params.segment_options())
        });
        progress.report(20, "segment");
        if self.finish_if_cancelled(grid, &mut table, &mut result, progress, total_start)? {
            return Ok(result);
        }

        result.cleaned_voxels = self.timed(&mut result, "cleanup", || {
            clean_bad_voxels(
                grid,
                &mut table,
                &self.params.phase_symmetries,
                &self.params.cleanup_options(),
            )
        });
        progress.report(40, "cleanup");
        if self.finish_if_cancelled(grid, &mut table, &mut result, progress, total_start)? {
            return Ok(result);
        }

        table = self.timed(&mut result, "compact", || {
            compact_grains(grid, &table, &self.params.compact_options()).0
        });
        progress.report(50, "compact");

        if self.params.merge_twins {
            if self.finish_if_cancelled(grid, &mut table, &mut result, progress, total_start)? {
                return Ok(result);
            }
            result.twin_merges = self.timed(&mut result, "mergeTwins", || {
                let graph = NeighborGraph::build(grid, &table, &self.params.phase_symmetries);
                let decisions =
                    find_twin_merges(&graph, &table, &self.params.phase_symmetries, &self.params.twin_options());
                self.apply_and_compact(grid, &mut table, &decisions)
            });
            progress.report(65, "mergeTwins");
        }

        if self.params.merge_colonies {
            if self.finish_if_cancelled(grid, &mut table, &mut result, progress, total_start)? {
                return Ok(result);
            }
            result.colony_merges = self.timed(&mut result, "mergeColonies", || {
                let graph = NeighborGraph::build(grid, &table, &self.params.phase_symmetries);
                let decisions = find_colony_merges(
                    &graph,
                    &table,
                    &self.params.phase_symmetries,
                    &self.params.colony_options(),
                );
                self.apply_and_compact(grid, &mut table, &decisions)
            });
            progress.report(75, "mergeColonies");
        }

        if self.finish_if_cancelled(grid, &mut table, &mut result, progress, total_start)? {
            return Ok(result);
        }
        result.contained_merges = self.timed(&mut result, "mergeContained", || {
            let graph = NeighborGraph::build(grid, &table, &self.params.phase_symmetries);
            let decisions = find_contained_merges(grid, &graph, &table);
            self.apply_and_compact(grid, &mut table, &decisions)
        });
        progress.report(90, "mergeContained");

        result.graph = self.timed(&mut result, "graph", || {
            NeighborGraph::build(grid, &table, &self.params.phase_symmetries)
        });

        self.finalize(grid, &table, &mut result, total_start);
        progress.report(100, "done");
        Ok(result)
    }

    fn timed<T>(&self, result: &mut ReconResult, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        result
            .timing
            .push(label, start.elapsed().as_secs_f64() * 1000.0);
        value
    }

    fn apply_and_compact(
        &self,
        grid: &mut VoxelGrid,
        table: &mut GrainTable,
        decisions: &[MergeDecision],
    ) -> usize {
        let merged = apply_merges(grid, table, decisions);
        if merged > 0 {
            *table = compact_grains(grid, table, &self.params.compact_options()).0;
        }
        merged
    }

    /// Polls cancellation; on cancel, compacts whatever the completed stages
    /// produced and fills the result so the caller still gets a consistent
    /// label field.
    fn finish_if_cancelled(
        &self,
        grid: &mut VoxelGrid,
        table: &mut GrainTable,
        result: &mut ReconResult,
        progress: &mut dyn ProgressSink,
        total_start: Instant,
    ) -> Result<bool, ReconError> {
        if !progress.is_cancelled() {
            return Ok(false);
        }
        debug!("reconstruction cancelled");
        *table = compact_grains(grid, table, &self.params.compact_options()).0;
        result.graph = NeighborGraph::build(grid, table, &self.params.phase_symmetries);
        result.cancelled = true;
        self.finalize(grid, table, result, total_start);
        Ok(true)
    }

    fn finalize(
        &self,
        grid: &VoxelGrid,
        table: &GrainTable,
        result: &mut ReconResult,
        total_start: Instant,
    ) {
        result.grain_count = table.grain_count();
        result.unassigned_voxels = grid.labels.iter().filter(|&&l| l == UNASSIGNED).count();
        result.graph_edges = result.graph.edge_count();
        result.timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "reconstruction done: {} grains, {} unassigned voxels, {:.1} ms",
            result.grain_count, result.unassigned_voxels, result.timing.total_ms
        );
    }
}
