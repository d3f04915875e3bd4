//! Result type returned by a reconstruction run.

use serde::Serialize;

use crate::graph::NeighborGraph;
use crate::reconstruct::TimingBreakdown;

/// Outcome of one pipeline run over a voxel grid.
///
/// The label field itself lives in the grid the pipeline mutated; this
/// struct carries the summary counters, the final neighbor graph and the
/// timing trace. Serializes to the JSON report emitted by the demo binary
/// (the graph is omitted there; its edge count is reported instead).
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconResult {
    /// Live grains after the final compaction.
    pub grain_count: usize,
    /// Voxels still at label 0 when the run finished.
    pub unassigned_voxels: usize,
    /// Bad voxels resolved by the cleanup pass.
    pub cleaned_voxels: usize,
    /// Grains absorbed by the twin merge pass.
    pub twin_merges: usize,
    /// Grains absorbed by the colony merge pass.
    pub colony_merges: usize,
    /// Grains absorbed by the contained-grain pass.
    pub contained_merges: usize,
    /// Edges in the final neighbor graph.
    pub graph_edges: usize,
    /// True when a cancellation request stopped the run early. The label
    /// field is still consistent: compacted up to the last completed stage.
    pub cancelled: bool,
    pub timing: TimingBreakdown,
    /// Final grain adjacency; rebuilt after the last label-changing stage.
    #[serde(skip)]
    pub graph: NeighborGraph,
}
