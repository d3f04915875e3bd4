#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod error;
pub mod grid;
pub mod reconstruct;
pub mod types;

// Stage-level modules – still public, but considered unstable internals.
pub mod cleanup;
pub mod grains;
pub mod graph;
pub mod merge;
pub mod orientation;
pub mod relabel;
pub mod segment;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline + results.
pub use crate::error::ReconError;
pub use crate::grid::VoxelGrid;
pub use crate::reconstruct::{NoProgress, ProgressSink, ReconParams, Reconstructor};
pub use crate::types::ReconResult;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use grain_recon::prelude::*;
///
/// # fn main() -> Result<(), grain_recon::ReconError> {
/// let mut grid = VoxelGrid::new(64, 64, 16);
/// // ... populate quats/phases/confidences from an EBSD reader ...
///
/// let recon = Reconstructor::new(ReconParams::default());
/// let result = recon.run(&mut grid, &mut NoProgress)?;
/// println!("{} grains, {} edges", result.grain_count, result.graph_edges);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::grid::VoxelGrid;
    pub use crate::reconstruct::{NoProgress, ProgressSink, ReconParams, Reconstructor};
    pub use crate::types::ReconResult;
}
