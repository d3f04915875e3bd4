//! Regular 3-D voxel grid holding per-voxel EBSD attributes.
//!
//! The grid owns the raster indexing scheme used by every stage:
//! `index = z * ny * nx + y * nx + x` (row-major, planes outermost). Scan
//! order over this index is a hard determinism requirement for the
//! segmentation stage — seeds are allocated in raster order, which decides
//! which grain wins contested regions.
//!
//! Per-voxel attributes live in parallel `Vec`s (orientation quaternion,
//! phase id, confidence index, image quality, grain label). The grid is
//! populated by an external EBSD reader and mutated in place by the pipeline
//! stages; dimensions are fixed at construction.

mod neighbors;

pub use neighbors::{FaceNeighbors, FACE_NEIGHBOR_COUNT};

use nalgebra::Quaternion;

/// Label value meaning "no grain assigned" / bad voxel. Never a live grain.
pub const UNASSIGNED: i32 = 0;

/// Fixed-size 3-D array of per-voxel EBSD attributes.
///
/// Indexed access is O(1) and bounds-checked by the underlying `Vec`s;
/// out-of-range access is a programming error. Neighbor enumeration via
/// [`VoxelGrid::face_neighbors`] is boundary-aware and never wraps.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    nx: usize,
    ny: usize,
    nz: usize,
    /// Per-voxel orientation, assumed normalized by the upstream reader.
    pub quats: Vec<Quaternion<f32>>,
    /// Phase id per voxel; 0 means unindexed.
    pub phases: Vec<u32>,
    /// Confidence index per voxel, 0..1.
    pub confidences: Vec<f32>,
    /// Image quality per voxel (scanner-dependent scale).
    pub image_qualities: Vec<f32>,
    /// Current grain label; [`UNASSIGNED`] until segmentation claims the
    /// voxel.
    pub labels: Vec<i32>,
}

impl VoxelGrid {
    /// Creates a grid of `nx * ny * nz` voxels with identity orientations,
    /// phase 0 and zeroed quality metrics.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        let n = nx * ny * nz;
        Self {
            nx,
            ny,
            nz,
            quats: vec![Quaternion::identity(); n],
            phases: vec![0; n],
            confidences: vec![0.0; n],
            image_qualities: vec![0.0; n],
            labels: vec![UNASSIGNED; n],
        }
    }

    /// Grid dimensions `(nx, ny, nz)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Total voxel count.
    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat raster index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);
        z * self.ny * self.nx + y * self.nx + x
    }

    /// Inverse of [`VoxelGrid::index`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let x = idx % self.nx;
        let y = (idx / self.nx) % self.ny;
        let z = idx / (self.nx * self.ny);
        (x, y, z)
    }

    /// Enumerates the up-to-6 face neighbors of `idx` in the fixed order
    /// −z, −y, −x, +x, +y, +z. Boundary faces are skipped, never wrapped.
    #[inline]
    pub fn face_neighbors(&self, idx: usize) -> FaceNeighbors {
        FaceNeighbors::new(self, idx)
    }

    /// The up-to-3 positive-direction face neighbors (+x, +y, +z) of `idx`.
    /// Enumerating only these visits every interior face exactly once, which
    /// the neighbor-graph builder relies on for shared-face counting.
    #[inline]
    pub fn forward_neighbors(&self, idx: usize) -> [Option<usize>; 3] {
        let (x, y, z) = self.coords(idx);
        [
            (x + 1 < self.nx).then(|| idx + 1),
            (y + 1 < self.ny).then(|| idx + self.nx),
            (z + 1 < self.nz).then(|| idx + self.nx * self.ny),
        ]
    }

    /// Resets every label to [`UNASSIGNED`]. Used by re-entrant runs.
    pub fn clear_labels(&mut self) {
        self.labels.fill(UNASSIGNED);
    }

    /// Sets the EBSD attributes of one voxel; a fixture/reader convenience.
    pub fn set_voxel(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        quat: Quaternion<f32>,
        phase: u32,
        confidence: f32,
        image_quality: f32,
    ) {
        let idx = self.index(x, y, z);
        self.quats[idx] = quat;
        self.phases[idx] = phase;
        self.confidences[idx] = confidence;
        self.image_qualities[idx] = image_quality;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_index_round_trip() {
        let grid = VoxelGrid::new(4, 3, 2);
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..4 {
                    let idx = grid.index(x, y, z);
                    assert_eq!(grid.coords(idx), (x, y, z));
                }
            }
        }
        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(3, 2, 1), grid.len() - 1);
    }

    #[test]
    fn corner_voxel_has_three_neighbors() {
        let grid = VoxelGrid::new(3, 3, 3);
        let corner = grid.index(0, 0, 0);
        let neighbors: Vec<usize> = grid.face_neighbors(corner).collect();
        assert_eq!(neighbors.len(), 3);
    }

    #[test]
    fn interior_voxel_has_six_neighbors_in_fixed_order() {
        let grid = VoxelGrid::new(3, 3, 3);
        let center = grid.index(1, 1, 1);
        let neighbors: Vec<usize> = grid.face_neighbors(center).collect();
        assert_eq!(
            neighbors,
            vec![
                grid.index(1, 1, 0),
                grid.index(1, 0, 1),
                grid.index(0, 1, 1),
                grid.index(2, 1, 1),
                grid.index(1, 2, 1),
                grid.index(1, 1, 2),
            ]
        );
    }

    #[test]
    fn neighbors_never_wrap_across_boundaries() {
        // 2x1x1: each voxel sees only the other, not a wrapped copy of
        // itself.
        let grid = VoxelGrid::new(2, 1, 1);
        let a: Vec<usize> = grid.face_neighbors(0).collect();
        let b: Vec<usize> = grid.face_neighbors(1).collect();
        assert_eq!(a, vec![1]);
        assert_eq!(b, vec![0]);
    }

    #[test]
    fn forward_neighbors_cover_each_face_once() {
        let grid = VoxelGrid::new(2, 2, 1);
        let mut faces = 0usize;
        for idx in 0..grid.len() {
            faces += grid
                .forward_neighbors(idx)
                .iter()
                .filter(|n| n.is_some())
                .count();
        }
        // 2x2x1 has 4 interior faces.
        assert_eq!(faces, 4);
    }
}
