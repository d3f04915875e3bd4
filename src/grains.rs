//! Per-grain bookkeeping shared by the pipeline stages.
//!
//! A [`GrainTable`] maps live grain labels (positive integers, dense after a
//! compaction pass) to their running state: voxel count, phase and the
//! quaternion running sum from which the average orientation is derived.
//! Label 0 is reserved for "unassigned" and always maps to a placeholder.

use nalgebra::Quaternion;

/// Running state of a single grain.
#[derive(Clone, Debug)]
pub struct Grain {
    /// Number of voxels currently carrying this grain's label.
    pub voxel_count: usize,
    /// Phase id of the seed voxel; all voxels of a grain share it.
    pub phase: u32,
    quat_sum: Quaternion<f32>,
    accumulated: usize,
}

impl Grain {
    pub fn new(phase: u32) -> Self {
        Self {
            voxel_count: 0,
            phase,
            quat_sum: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            accumulated: 0,
        }
    }

    /// Folds one voxel orientation into the running sum. Callers are
    /// expected to pass the symmetry-equivalent nearest to the grain's
    /// current average (see `orientation::quat::nearest_equivalent`), so the
    /// sum does not cancel across the fundamental zone.
    pub fn accumulate_orientation(&mut self, q: &Quaternion<f32>) {
        self.quat_sum += *q;
        self.accumulated += 1;
    }

    /// Average orientation of the grain, normalized. Identity if nothing has
    /// been accumulated.
    pub fn average_quat(&self) -> Quaternion<f32> {
        let norm = self.quat_sum.norm();
        if self.accumulated == 0 || norm < 1e-12 {
            Quaternion::identity()
        } else {
            self.quat_sum / norm
        }
    }

    /// The raw running sum; used when a merge folds one grain into another.
    pub fn quat_sum(&self) -> Quaternion<f32> {
        self.quat_sum
    }

    /// Absorbs another grain's accumulated state (merge support).
    pub fn absorb(&mut self, other: &Grain) {
        self.voxel_count += other.voxel_count;
        self.quat_sum += other.quat_sum;
        self.accumulated += other.accumulated;
    }
}

/// Dense table of grains indexed by label. Index 0 is a placeholder so that
/// `table[label]` works directly with voxel labels.
#[derive(Clone, Debug, Default)]
pub struct GrainTable {
    grains: Vec<Grain>,
}

impl GrainTable {
    pub fn new() -> Self {
        Self {
            grains: vec![Grain::new(0)],
        }
    }

    /// Number of live grains (excludes the label-0 placeholder).
    pub fn grain_count(&self) -> usize {
        self.grains.len().saturating_sub(1)
    }

    /// Allocates the next grain label and returns it.
    pub fn push(&mut self, grain: Grain) -> i32 {
        self.grains.push(grain);
        (self.grains.len() - 1) as i32
    }

    pub fn get(&self, label: i32) -> Option<&Grain> {
        if label <= 0 {
            return None;
        }
        self.grains.get(label as usize)
    }

    pub fn get_mut(&mut self, label: i32) -> Option<&mut Grain> {
        if label <= 0 {
            return None;
        }
        self.grains.get_mut(label as usize)
    }

    /// Iterates `(label, grain)` over live grains in label order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Grain)> {
        self.grains
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, g)| (i as i32, g))
    }
}
