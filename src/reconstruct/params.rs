//! Parameter types configuring the reconstruction stages.
//!
//! [`ReconParams`] groups the knobs for segmentation, cleanup, compaction
//! and the merge passes. Angles are held in degrees here (the natural unit
//! for EBSD tolerances in config files) and converted to radians at the
//! stage boundaries.

use serde::{Deserialize, Serialize};

use crate::cleanup::{CleanupOptions, PhasePolicy};
use crate::error::ReconError;
use crate::grid::VoxelGrid;
use crate::merge::{ColonyOptions, TwinOptions};
use crate::orientation::CrystalSymmetry;
use crate::relabel::CompactOptions;
use crate::segment::SegmentOptions;

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconParams {
    /// Misorientation below which two voxels belong to one grain (degrees).
    pub misorientation_tolerance_deg: f32,
    /// Minimum confidence index for a voxel to seed or join growth.
    pub min_seed_confidence: f32,
    /// Minimum image quality for a voxel to seed or join growth.
    pub min_seed_image_quality: f32,
    /// Grains below this voxel count are removed at compaction; 0 disables.
    pub min_allowed_grain_size: usize,
    /// Minimum agreeing neighbors for cleanup resolution (0..=6).
    pub required_neighbors: u8,
    /// Which phase the cleanup pass reads symmetry through.
    pub phase_policy: PhasePolicy,
    /// Enables the twin merge pass (cubic phases).
    pub merge_twins: bool,
    /// Enables the colony merge pass (hexagonal phases).
    pub merge_colonies: bool,
    pub twin: TwinParams,
    pub colony: ColonyParams,
    /// Crystal class per phase id; entry 0 is unused but must be present
    /// when any indexed phase exists.
    pub phase_symmetries: Vec<CrystalSymmetry>,
}

impl Default for ReconParams {
    fn default() -> Self {
        Self {
            misorientation_tolerance_deg: 5.0,
            min_seed_confidence: 0.1,
            min_seed_image_quality: 0.0,
            min_allowed_grain_size: 0,
            required_neighbors: 6,
            phase_policy: PhasePolicy::default(),
            merge_twins: false,
            merge_colonies: false,
            twin: TwinParams::default(),
            colony: ColonyParams::default(),
            phase_symmetries: vec![CrystalSymmetry::Cubic, CrystalSymmetry::Cubic],
        }
    }
}

/// Twin-boundary tolerances in degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwinParams {
    pub angle_tol_deg: f32,
    pub axis_tol_deg: f32,
}

impl Default for TwinParams {
    fn default() -> Self {
        Self {
            angle_tol_deg: 2.0,
            axis_tol_deg: 2.0,
        }
    }
}

/// Colony-variant tolerance (Rodrigues components, dimensionless).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColonyParams {
    pub component_tol: f32,
}

impl Default for ColonyParams {
    fn default() -> Self {
        Self { component_tol: 0.03 }
    }
}

impl ReconParams {
    /// Validates the parameters against a grid before the pipeline runs.
    pub fn validate(&self, grid: &VoxelGrid) -> Result<(), ReconError> {
        let (nx, ny, nz) = grid.dims();
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ReconError::Config(format!(
                "grid has a zero dimension: {nx}x{ny}x{nz}"
            )));
        }
        if !self.misorientation_tolerance_deg.is_finite()
            || self.misorientation_tolerance_deg <= 0.0
        {
            return Err(ReconError::Config(format!(
                "misorientation tolerance must be a positive finite angle, got {}",
                self.misorientation_tolerance_deg
            )));
        }
        if self.required_neighbors > 6 {
            return Err(ReconError::Config(format!(
                "required neighbors must be 0..=6, got {}",
                self.required_neighbors
            )));
        }
        if let Some(&max_phase) = grid.phases.iter().max() {
            if max_phase > 0 && self.phase_symmetries.len() <= max_phase as usize {
                return Err(ReconError::Config(format!(
                    "grid references phase {max_phase} but only {} symmetries are configured",
                    self.phase_symmetries.len()
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            tolerance_rad: self.misorientation_tolerance_deg.to_radians(),
            min_seed_confidence: self.min_seed_confidence,
            min_seed_image_quality: self.min_seed_image_quality,
        }
    }

    pub(crate) fn cleanup_options(&self) -> CleanupOptions {
        CleanupOptions {
            tolerance_rad: self.misorientation_tolerance_deg.to_radians(),
            required_neighbors: self.required_neighbors,
            phase_policy: self.phase_policy,
        }
    }

    pub(crate) fn compact_options(&self) -> CompactOptions {
        CompactOptions {
            min_allowed_grain_size: self.min_allowed_grain_size,
        }
    }

    pub(crate) fn twin_options(&self) -> TwinOptions {
        TwinOptions {
            angle_tol_rad: self.twin.angle_tol_deg.to_radians(),
            axis_tol_rad: self.twin.axis_tol_deg.to_radians(),
        }
    }

    pub(crate) fn colony_options(&self) -> ColonyOptions {
        ColonyOptions {
            component_tol: self.colony.component_tol,
        }
    }
}
