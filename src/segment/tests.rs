use super::*;
use crate::grid::{VoxelGrid, UNASSIGNED};
use crate::orientation::quat::from_axis_angle;
use crate::orientation::CrystalSymmetry;
use nalgebra::{Quaternion, Vector3};

fn cubic_phases() -> Vec<CrystalSymmetry> {
    vec![CrystalSymmetry::Cubic, CrystalSymmetry::Cubic]
}

fn uniform_grid(nx: usize, ny: usize, nz: usize) -> VoxelGrid {
    let mut grid = VoxelGrid::new(nx, ny, nz);
    for idx in 0..grid.len() {
        grid.phases[idx] = 1;
        grid.confidences[idx] = 1.0;
        grid.image_qualities[idx] = 100.0;
        grid.quats[idx] = Quaternion::identity();
    }
    grid
}

#[test]
fn uniform_volume_is_one_grain() {
    let mut grid = uniform_grid(3, 3, 1);
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 1);
    assert!(grid.labels.iter().all(|&l| l == 1));
    assert_eq!(table.get(1).map(|g| g.voxel_count), Some(9));
}

#[test]
fn phase_zero_is_never_labeled() {
    let mut grid = uniform_grid(3, 3, 1);
    for idx in 0..grid.len() {
        grid.phases[idx] = 0;
    }
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 0);
    assert!(grid.labels.iter().all(|&l| l == UNASSIGNED));
}

#[test]
fn low_confidence_voxel_is_skipped_by_growth() {
    let mut grid = uniform_grid(3, 3, 1);
    let center = grid.index(1, 1, 0);
    grid.confidences[center] = 0.0;
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 1);
    assert_eq!(grid.labels[center], UNASSIGNED);
    assert_eq!(table.get(1).map(|g| g.voxel_count), Some(8));
}

#[test]
fn incompatible_orientation_splits_grains() {
    // Left half identity, right half rotated 30° about X: beyond a 5°
    // tolerance under cubic symmetry, so two grains.
    let mut grid = uniform_grid(4, 2, 1);
    let rotated = from_axis_angle(30f32.to_radians(), Vector3::x());
    for y in 0..2 {
        for x in 2..4 {
            let idx = grid.index(x, y, 0);
            grid.quats[idx] = rotated;
        }
    }
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 2);
    assert_eq!(grid.labels[grid.index(0, 0, 0)], 1);
    assert_eq!(grid.labels[grid.index(3, 0, 0)], 2);
}

#[test]
fn symmetry_equivalent_rotation_joins_one_grain() {
    // 90° about Z is a cubic operator: both voxels are the same orientation
    // up to symmetry.
    let mut grid = uniform_grid(2, 1, 1);
    grid.quats[1] = from_axis_angle(std::f32::consts::FRAC_PI_2, Vector3::z());
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 1);
    assert_eq!(grid.labels, vec![1, 1]);
}

#[test]
fn label_assignment_is_deterministic() {
    let mut a = uniform_grid(5, 4, 3);
    let rotated = from_axis_angle(0.5, Vector3::new(1.0, 1.0, 0.0).normalize());
    for idx in (0..a.len()).step_by(7) {
        a.quats[idx] = rotated;
    }
    let mut b = a.clone();
    segment_grains(&mut a, &cubic_phases(), &SegmentOptions::default());
    segment_grains(&mut b, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(a.labels, b.labels);
}

#[test]
fn labels_are_dense_from_one_in_scan_order() {
    // Four mutually incompatible orientations: four single-voxel grains,
    // labeled in scan order.
    let mut grid = uniform_grid(4, 1, 1);
    grid.quats[1] = from_axis_angle(0.8, Vector3::y());
    grid.quats[2] = from_axis_angle(0.4, Vector3::x());
    grid.quats[3] = from_axis_angle(1.2, Vector3::z());
    let table = segment_grains(&mut grid, &cubic_phases(), &SegmentOptions::default());
    assert_eq!(table.grain_count(), 4);
    assert_eq!(grid.labels, vec![1, 2, 3, 4]);
}
