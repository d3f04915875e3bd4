//! Boundary-aware 6-connected (face) neighbor enumeration.

use super::VoxelGrid;

/// Maximum number of face neighbors of a voxel.
pub const FACE_NEIGHBOR_COUNT: usize = 6;

/// Iterator over the face neighbors of one voxel, in the fixed order
/// −z, −y, −x, +x, +y, +z. Produced by [`VoxelGrid::face_neighbors`].
///
/// The enumeration order matters: the cleanup stage's vote scanning and the
/// segmenter's frontier growth both follow it, and reordering would change
/// which grain wins ties.
pub struct FaceNeighbors {
    items: [usize; FACE_NEIGHBOR_COUNT],
    len: usize,
    cursor: usize,
}

impl FaceNeighbors {
    pub(super) fn new(grid: &VoxelGrid, idx: usize) -> Self {
        let (nx, ny, nz) = grid.dims();
        let (x, y, z) = grid.coords(idx);
        let plane = nx * ny;

        let mut items = [0usize; FACE_NEIGHBOR_COUNT];
        let mut len = 0;
        if z > 0 {
            items[len] = idx - plane;
            len += 1;
        }
        if y > 0 {
            items[len] = idx - nx;
            len += 1;
        }
        if x > 0 {
            items[len] = idx - 1;
            len += 1;
        }
        if x + 1 < nx {
            items[len] = idx + 1;
            len += 1;
        }
        if y + 1 < ny {
            items[len] = idx + nx;
            len += 1;
        }
        if z + 1 < nz {
            items[len] = idx + plane;
            len += 1;
        }
        Self {
            items,
            len,
            cursor: 0,
        }
    }
}

impl Iterator for FaceNeighbors {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cursor < self.len {
            let item = self.items[self.cursor];
            self.cursor += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FaceNeighbors {}
