use serde::{Deserialize, Serialize};

/// Thresholds controlling seed eligibility and frontier growth.
///
/// - `tolerance_rad`: misorientation below which two face-adjacent voxels
///   belong to the same grain. Compared with a strict `<`; voxels exactly at
///   tolerance are excluded (reproducibility requirement).
/// - `min_seed_confidence` / `min_seed_image_quality`: a voxel failing either
///   threshold is bad data — it neither seeds nor joins a grain and is left
///   for the cleanup stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SegmentOptions {
    pub tolerance_rad: f32,
    pub min_seed_confidence: f32,
    pub min_seed_image_quality: f32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            tolerance_rad: 5.0f32.to_radians(),
            min_seed_confidence: 0.1,
            min_seed_image_quality: 0.0,
        }
    }
}
