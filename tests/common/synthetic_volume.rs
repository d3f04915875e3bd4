use grain_recon::orientation::quat::from_axis_angle;
use grain_recon::VoxelGrid;
use nalgebra::{Quaternion, Vector3};

/// Fills a grid with phase 1, full confidence/quality and identity
/// orientations.
pub fn uniform_volume(nx: usize, ny: usize, nz: usize) -> VoxelGrid {
    let mut grid = VoxelGrid::new(nx, ny, nz);
    for idx in 0..grid.len() {
        grid.phases[idx] = 1;
        grid.confidences[idx] = 1.0;
        grid.image_qualities[idx] = 100.0;
        grid.quats[idx] = Quaternion::identity();
    }
    grid
}

/// Two-grain volume split along x at `split`: identity on the left, the
/// given rotation on the right.
pub fn split_volume(
    nx: usize,
    ny: usize,
    nz: usize,
    split: usize,
    angle_rad: f32,
    axis: Vector3<f32>,
) -> VoxelGrid {
    let mut grid = uniform_volume(nx, ny, nz);
    let rotated = from_axis_angle(angle_rad, axis);
    for idx in 0..grid.len() {
        let (x, _, _) = grid.coords(idx);
        if x >= split {
            grid.quats[idx] = rotated;
        }
    }
    grid
}
