//! Crystallographic grain merging: twins, colonies and contained grains.
//!
//! Each detector walks the neighbor graph and emits [`MergeDecision`]s;
//! [`apply_merges`] then rewrites the label field in one sweep. Detection
//! and application are split so a pass sees a consistent graph: decisions
//! are made against the pre-merge adjacency, and chained decisions
//! (A→B while B→C) are chased to their final target during application.
//!
//! - Twin merge (cubic phases): an edge is a coherent twin boundary when the
//!   grain-average misorientation is 60° about ⟨111⟩ within the configured
//!   angle and axis tolerances.
//! - Colony merge (hexagonal phases): the misorientation, expressed as a
//!   Rodrigues vector, is compared component-wise against the known
//!   Burgers-related colony variants.
//! - Contained grains: a grain that touches exactly one other grain and
//!   shares the majority of its surface with it is absorbed by that
//!   neighbor, phase regardless.
//!
//! The smaller label always survives a twin/colony merge; a contained grain
//! merges into its sole neighbor whichever way the labels order.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grains::GrainTable;
use crate::graph::NeighborGraph;
use crate::grid::{VoxelGrid, FACE_NEIGHBOR_COUNT, UNASSIGNED};
use crate::orientation::quat::axis_angle_to_rodrigues;
use crate::orientation::CrystalSymmetry;

/// Rodrigues-space signatures of the Burgers-related variants that identify
/// a hexagonal colony boundary. Compared component-wise on absolute values.
const COLONY_VARIANTS: [[f32; 3]; 9] = [
    [0.0, 0.0, 0.0919],
    [0.289, 0.5, 0.0],
    [0.577_35, 0.0, 0.0],
    [0.33, 0.473, 0.093],
    [0.577, 0.053, 0.093],
    [0.293, 0.508, 0.188],
    [0.586_6, 0.0, 0.188],
    [0.576_9, 0.816_8, 0.0],
    [0.995_8, 0.091_2, 0.0],
];

/// Why two grains were merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeReason {
    Twin,
    Colony,
    Contained,
}

/// One source grain folding into a target grain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeDecision {
    pub target: i32,
    pub source: i32,
    pub reason: MergeReason,
}

/// Tolerances for twin-boundary detection.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TwinOptions {
    /// Allowed deviation from the ideal 60° twin angle (radians).
    pub angle_tol_rad: f32,
    /// Allowed angular deviation of the axis from ⟨111⟩ (radians).
    pub axis_tol_rad: f32,
}

impl Default for TwinOptions {
    fn default() -> Self {
        Self {
            angle_tol_rad: 2.0f32.to_radians(),
            axis_tol_rad: 2.0f32.to_radians(),
        }
    }
}

/// Tolerance for colony-variant matching in Rodrigues space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ColonyOptions {
    /// Per-component tolerance against each variant signature.
    pub component_tol: f32,
}

impl Default for ColonyOptions {
    fn default() -> Self {
        Self { component_tol: 0.03 }
    }
}

/// Finds twin boundaries among cubic-phase grain pairs.
///
/// Only edges carrying a misorientation (same-phase pairs) are considered;
/// the emitted decisions fold the larger label into the smaller.
pub fn find_twin_merges(
    graph: &NeighborGraph,
    table: &GrainTable,
    phase_symmetries: &[CrystalSymmetry],
    options: &TwinOptions,
) -> Vec<MergeDecision> {
    let ideal_angle = 60.0f32.to_radians();
    let sqrt3 = 3.0f32.sqrt();
    let mut decisions = Vec::new();
    for (&(a, b), edge) in graph.iter() {
        let Some(grain) = table.get(a) else { continue };
        if phase_symmetries.get(grain.phase as usize) != Some(&CrystalSymmetry::Cubic) {
            continue;
        }
        let Some(m) = edge.misorientation else { continue };
        if (m.angle - ideal_angle).abs() >= options.angle_tol_rad {
            continue;
        }
        // Distance of the axis from the nearest ⟨111⟩ direction, folded by
        // cubic symmetry into |n1|+|n2|+|n3| over √3.
        let dot = (m.axis.x.abs() + m.axis.y.abs() + m.axis.z.abs()) / sqrt3;
        let axis_dev = dot.clamp(-1.0, 1.0).acos();
        if axis_dev < options.axis_tol_rad {
            decisions.push(MergeDecision {
                target: a,
                source: b,
                reason: MergeReason::Twin,
            });
        }
    }
    decisions
}

/// Finds colony boundaries among hexagonal-phase grain pairs.
pub fn find_colony_merges(
    graph: &NeighborGraph,
    table: &GrainTable,
    phase_symmetries: &[CrystalSymmetry],
    options: &ColonyOptions,
) -> Vec<MergeDecision> {
    let mut decisions = Vec::new();
    for (&(a, b), edge) in graph.iter() {
        let Some(grain) = table.get(a) else { continue };
        if phase_symmetries.get(grain.phase as usize) != Some(&CrystalSymmetry::Hexagonal) {
            continue;
        }
        let Some(m) = edge.misorientation else { continue };
        let r = axis_angle_to_rodrigues(m.angle, m.axis);
        let is_colony = COLONY_VARIANTS.iter().any(|v| {
            (r.x.abs() - v[0]).abs() < options.component_tol
                && (r.y.abs() - v[1]).abs() < options.component_tol
                && (r.z.abs() - v[2]).abs() < options.component_tol
        });
        if is_colony {
            decisions.push(MergeDecision {
                target: a,
                source: b,
                reason: MergeReason::Colony,
            });
        }
    }
    decisions
}

/// Finds grains fully contained in a single neighboring grain.
///
/// Containment is judged by shared-face dominance: the candidate touches
/// exactly one other grain, and the faces it shares with that grain
/// outnumber its free faces (volume boundary or unassigned voxels). A
/// half-volume grain whose sole neighbor is the other half fails the
/// dominance test and survives.
pub fn find_contained_merges(
    grid: &VoxelGrid,
    graph: &NeighborGraph,
    table: &GrainTable,
) -> Vec<MergeDecision> {
    // Free faces per label: faces leaving the volume or touching label 0.
    let mut free_faces = vec![0usize; table.grain_count() + 1];
    for idx in 0..grid.len() {
        let label = grid.labels[idx];
        if label <= 0 {
            continue;
        }
        let mut enumerated = 0usize;
        let mut open = 0usize;
        for neighbor in grid.face_neighbors(idx) {
            enumerated += 1;
            if grid.labels[neighbor] == UNASSIGNED {
                open += 1;
            }
        }
        free_faces[label as usize] += open + (FACE_NEIGHBOR_COUNT - enumerated);
    }

    let mut decisions = Vec::new();
    for (label, _) in table.iter() {
        let neighbors = graph.neighbors_of(label);
        if let [sole] = neighbors[..] {
            let shared = graph
                .edge(label, sole)
                .map(|e| e.shared_faces)
                .unwrap_or(0);
            if shared > free_faces[label as usize] {
                decisions.push(MergeDecision {
                    target: sole,
                    source: label,
                    reason: MergeReason::Contained,
                });
            }
        }
    }
    decisions
}

/// Applies a batch of decisions: rewrites source labels to their final
/// target (chasing chains) in one sweep and pools grain state. Returns the
/// number of grains merged away.
///
/// The label field is left sparse; callers re-compact afterwards.
pub fn apply_merges(
    grid: &mut VoxelGrid,
    table: &mut GrainTable,
    decisions: &[MergeDecision],
) -> usize {
    if decisions.is_empty() {
        return 0;
    }

    let mut target_of = vec![0i32; table.grain_count() + 1];
    for (label, _) in table.iter() {
        target_of[label as usize] = label;
    }
    for d in decisions {
        if d.source > 0 && d.target > 0 && d.source != d.target {
            target_of[d.source as usize] = d.target;
        }
    }
    // Chase chains so A→B, B→C resolves A→C. Collapse-to-root; cycles
    // (mutual decisions) settle on the smaller label.
    let mut merged = 0usize;
    for label in 1..target_of.len() {
        let mut root = label as i32;
        let mut hops = 0;
        while target_of[root as usize] != root && hops <= target_of.len() {
            root = target_of[root as usize];
            hops += 1;
            if root as usize == label {
                root = decisions
                    .iter()
                    .filter(|d| d.source as usize == label || d.target as usize == label)
                    .map(|d| d.source.min(d.target))
                    .min()
                    .unwrap_or(label as i32);
                break;
            }
        }
        if root != label as i32 {
            merged += 1;
        }
        target_of[label] = root;
    }

    for label in grid.labels.iter_mut() {
        if *label > 0 {
            *label = target_of[*label as usize];
        }
    }

    // Pool grain state into the surviving grains.
    for label in 1..target_of.len() {
        let root = target_of[label];
        if root == label as i32 {
            continue;
        }
        let source = match table.get(label as i32) {
            Some(g) => g.clone(),
            None => continue,
        };
        if let Some(target) = table.get_mut(root) {
            target.absorb(&source);
        }
        if let Some(dead) = table.get_mut(label as i32) {
            dead.voxel_count = 0;
        }
    }

    debug!("merge: {} grains absorbed", merged);
    merged
}
