//! Grain neighbor graph built from the segmented label field.
//!
//! An undirected edge connects two grains wherever at least one voxel face
//! separates them; the edge weight is the count of such faces. The builder
//! walks every voxel once and inspects only the three positive-direction
//! (+x, +y, +z) face neighbors, so each interior face is examined exactly
//! once and the shared-face counts are exact, not doubled.
//!
//! For same-phase grain pairs the edge also records the misorientation
//! between the two grain average orientations; cross-phase edges keep the
//! adjacency but no misorientation, since the two operator sets are not
//! comparable.

use std::collections::BTreeMap;

use log::debug;

use crate::grains::GrainTable;
use crate::grid::{VoxelGrid, UNASSIGNED};
use crate::orientation::{misorientation, CrystalSymmetry, Misorientation};

/// One undirected grain-adjacency edge.
#[derive(Clone, Copy, Debug)]
pub struct NeighborEdge {
    /// Number of voxel faces shared by the two grains.
    pub shared_faces: usize,
    /// Misorientation between grain average orientations; `None` for
    /// cross-phase pairs.
    pub misorientation: Option<Misorientation>,
}

/// Adjacency structure over grain labels.
///
/// Edges are keyed by `(min_label, max_label)` in a `BTreeMap`, so iteration
/// order is deterministic and independent of build order. Grains with no
/// assigned neighbors simply have no entries.
#[derive(Clone, Debug, Default)]
pub struct NeighborGraph {
    edges: BTreeMap<(i32, i32), NeighborEdge>,
}

impl NeighborGraph {
    /// Builds the graph from the current label field.
    ///
    /// Unassigned voxels contribute no edges; faces inside a single grain
    /// are skipped.
    pub fn build(
        grid: &VoxelGrid,
        table: &GrainTable,
        phase_symmetries: &[CrystalSymmetry],
    ) -> Self {
        let mut graph = Self::default();
        for idx in 0..grid.len() {
            let a = grid.labels[idx];
            if a == UNASSIGNED {
                continue;
            }
            for neighbor in grid.forward_neighbors(idx).into_iter().flatten() {
                let b = grid.labels[neighbor];
                if b == UNASSIGNED || b == a {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                graph
                    .edges
                    .entry(key)
                    .or_insert(NeighborEdge {
                        shared_faces: 0,
                        misorientation: None,
                    })
                    .shared_faces += 1;
            }
        }

        for (&(a, b), edge) in graph.edges.iter_mut() {
            let (Some(ga), Some(gb)) = (table.get(a), table.get(b)) else {
                continue;
            };
            if ga.phase != gb.phase {
                continue;
            }
            if let Some(&symmetry) = phase_symmetries.get(ga.phase as usize) {
                edge.misorientation = Some(misorientation(
                    &ga.average_quat(),
                    &gb.average_quat(),
                    symmetry,
                ));
            }
        }

        debug!("graph: {} edges", graph.edges.len());
        graph
    }

    /// The edge between `a` and `b`, if they share at least one face.
    pub fn edge(&self, a: i32, b: i32) -> Option<&NeighborEdge> {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.get(&key)
    }

    /// Iterates `((a, b), edge)` with `a < b`, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(i32, i32), &NeighborEdge)> {
        self.edges.iter()
    }

    /// Labels adjacent to `label`, ascending.
    pub fn neighbors_of(&self, label: i32) -> Vec<i32> {
        let mut out = Vec::new();
        for &(a, b) in self.edges.keys() {
            if a == label {
                out.push(b);
            } else if b == label {
                out.push(a);
            }
        }
        out.sort_unstable();
        out
    }

    /// Number of distinct grains adjacent to `label`.
    pub fn neighbor_count(&self, label: i32) -> usize {
        self.edges
            .keys()
            .filter(|&&(a, b)| a == label || b == label)
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
