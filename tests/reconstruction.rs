mod common;

use common::synthetic_volume::{split_volume, uniform_volume};
use grain_recon::orientation::quat::from_axis_angle;
use grain_recon::orientation::CrystalSymmetry;
use grain_recon::reconstruct::{NoProgress, ProgressSink, ReconParams, Reconstructor};
use nalgebra::Vector3;

#[test]
fn uniform_volume_reconstructs_to_one_grain() {
    let mut grid = uniform_volume(6, 6, 3);
    let recon = Reconstructor::new(ReconParams::default());
    let result = recon.run(&mut grid, &mut NoProgress).unwrap();

    assert_eq!(result.grain_count, 1);
    assert_eq!(result.unassigned_voxels, 0);
    assert_eq!(result.graph_edges, 0);
    assert!(grid.labels.iter().all(|&l| l == 1));
    assert!(!result.cancelled);
}

#[test]
fn two_misoriented_blocks_stay_separate_grains() {
    let mut grid = split_volume(6, 4, 2, 3, 35f32.to_radians(), Vector3::x());
    let recon = Reconstructor::new(ReconParams::default());
    let result = recon.run(&mut grid, &mut NoProgress).unwrap();

    assert_eq!(result.grain_count, 2);
    assert_eq!(result.graph_edges, 1);
    // One boundary plane spanning the 4x2 cross-section.
    assert_eq!(result.graph.edge(1, 2).unwrap().shared_faces, 8);
}

#[test]
fn low_confidence_interior_voxel_is_cleaned_up() {
    let mut grid = uniform_volume(3, 3, 3);
    let center = grid.index(1, 1, 1);
    grid.confidences[center] = 0.0;

    let recon = Reconstructor::new(ReconParams::default());
    let result = recon.run(&mut grid, &mut NoProgress).unwrap();

    // All six face neighbors agree, so the default requirement of 6 is met.
    assert_eq!(result.cleaned_voxels, 1);
    assert_eq!(result.unassigned_voxels, 0);
    assert_eq!(result.grain_count, 1);
    assert_eq!(grid.labels[center], 1);
}

#[test]
fn twin_boundary_merges_when_enabled() {
    let axis = Vector3::new(1.0, 1.0, 1.0).normalize();
    let mut grid = split_volume(6, 4, 2, 3, 60f32.to_radians(), axis);

    let params = ReconParams {
        merge_twins: true,
        ..Default::default()
    };
    let result = Reconstructor::new(params)
        .run(&mut grid, &mut NoProgress)
        .unwrap();

    assert_eq!(result.twin_merges, 1);
    assert_eq!(result.grain_count, 1);
    assert!(grid.labels.iter().all(|&l| l == 1));
}

#[test]
fn twin_boundary_survives_when_merging_disabled() {
    let axis = Vector3::new(1.0, 1.0, 1.0).normalize();
    let mut grid = split_volume(6, 4, 2, 3, 60f32.to_radians(), axis);

    let result = Reconstructor::new(ReconParams::default())
        .run(&mut grid, &mut NoProgress)
        .unwrap();

    assert_eq!(result.twin_merges, 0);
    assert_eq!(result.grain_count, 2);
}

#[test]
fn colony_boundary_merges_for_hexagonal_phases() {
    // Rodrigues (0, 0, 0.0919): rotation about Z by 2·atan(0.0919) ≈ 10.5°,
    // beyond the 5° growth tolerance but on the colony variant list.
    let angle = 2.0 * 0.0919f32.atan();
    let mut grid = split_volume(4, 2, 1, 2, angle, Vector3::z());

    let params = ReconParams {
        merge_colonies: true,
        phase_symmetries: vec![CrystalSymmetry::Hexagonal, CrystalSymmetry::Hexagonal],
        ..Default::default()
    };
    let result = Reconstructor::new(params)
        .run(&mut grid, &mut NoProgress)
        .unwrap();

    assert_eq!(result.colony_merges, 1);
    assert_eq!(result.grain_count, 1);
}

#[test]
fn fully_contained_grain_is_absorbed() {
    // 3x3x3 volume with a misoriented center voxel: it segments as its own
    // grain whose only neighbor is the surrounding grain.
    let mut grid = uniform_volume(3, 3, 3);
    let center = grid.index(1, 1, 1);
    grid.quats[center] = from_axis_angle(30f32.to_radians(), Vector3::x());

    let result = Reconstructor::new(ReconParams::default())
        .run(&mut grid, &mut NoProgress)
        .unwrap();

    assert_eq!(result.contained_merges, 1);
    assert_eq!(result.grain_count, 1);
    assert_eq!(grid.labels[center], 1);
}

#[test]
fn undersized_grains_are_filtered_out() {
    let mut grid = uniform_volume(4, 4, 1);
    // One rotated corner voxel forms a single-voxel grain.
    let corner = grid.index(3, 3, 0);
    grid.quats[corner] = from_axis_angle(40f32.to_radians(), Vector3::y());

    let params = ReconParams {
        min_allowed_grain_size: 2,
        // Keep cleanup from re-claiming the freed voxel.
        required_neighbors: 6,
        ..Default::default()
    };
    let result = Reconstructor::new(params)
        .run(&mut grid, &mut NoProgress)
        .unwrap();

    // Contained-grain absorption runs after compaction freed the voxel, so
    // only the big grain remains and the corner stays unassigned.
    assert_eq!(result.grain_count, 1);
    assert_eq!(result.unassigned_voxels, 1);
    assert_eq!(grid.labels[corner], 0);
}

#[test]
fn reconstruction_is_deterministic() {
    let mut a = split_volume(5, 5, 2, 2, 20f32.to_radians(), Vector3::y());
    for idx in (0..a.len()).step_by(11) {
        a.confidences[idx] = 0.0;
    }
    let mut b = a.clone();

    let recon = Reconstructor::new(ReconParams::default());
    let ra = recon.run(&mut a, &mut NoProgress).unwrap();
    let rb = recon.run(&mut b, &mut NoProgress).unwrap();

    assert_eq!(a.labels, b.labels);
    assert_eq!(ra.grain_count, rb.grain_count);
    assert_eq!(ra.cleaned_voxels, rb.cleaned_voxels);
}

#[test]
fn rerunning_on_the_same_grid_resets_labels() {
    let mut grid = uniform_volume(4, 4, 2);
    let recon = Reconstructor::new(ReconParams::default());
    let first = recon.run(&mut grid, &mut NoProgress).unwrap();
    let labels = grid.labels.clone();
    let second = recon.run(&mut grid, &mut NoProgress).unwrap();

    assert_eq!(grid.labels, labels);
    assert_eq!(first.grain_count, second.grain_count);
}

struct CancelAfter {
    reports_seen: usize,
    cancel_after: usize,
}

impl ProgressSink for CancelAfter {
    fn report(&mut self, _percent: u8, _stage: &str) {
        self.reports_seen += 1;
    }

    fn is_cancelled(&self) -> bool {
        self.reports_seen >= self.cancel_after
    }
}

#[test]
fn cancellation_returns_a_consistent_partial_result() {
    let mut grid = split_volume(6, 4, 2, 3, 35f32.to_radians(), Vector3::x());
    let mut sink = CancelAfter {
        reports_seen: 0,
        cancel_after: 1,
    };
    let result = Reconstructor::new(ReconParams::default())
        .run(&mut grid, &mut sink)
        .unwrap();

    assert!(result.cancelled);
    // Labels from the completed segmentation stage remain, compacted.
    assert_eq!(result.grain_count, 2);
    let max = grid.labels.iter().copied().max().unwrap();
    assert_eq!(max as usize, result.grain_count);
}

#[test]
fn invalid_parameters_are_rejected_before_running() {
    let mut grid = uniform_volume(2, 2, 1);
    let params = ReconParams {
        misorientation_tolerance_deg: f32::NAN,
        ..Default::default()
    };
    let err = Reconstructor::new(params)
        .run(&mut grid, &mut NoProgress)
        .unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}
