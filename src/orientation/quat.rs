//! Quaternion helpers shared by the segmentation and merge stages.

use nalgebra::{Quaternion, Vector3};

/// Fallback axis reported for degenerate rotations (zero angle or zero-norm
/// axis vector).
pub const DEGENERATE_AXIS: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Builds a unit quaternion from a rotation of `angle` radians about `axis`.
/// The axis is normalized internally; a zero axis yields the identity.
pub fn from_axis_angle(angle: f32, axis: Vector3<f32>) -> Quaternion<f32> {
    let norm = axis.norm();
    if norm < 1e-12 {
        return Quaternion::identity();
    }
    let half = angle * 0.5;
    let s = half.sin() / norm;
    Quaternion::new(half.cos(), axis.x * s, axis.y * s, axis.z * s)
}

/// Builds a unit quaternion from Bunge Euler angles (Z-X-Z convention,
/// radians), the representation EBSD scans are delivered in.
pub fn from_euler(phi1: f32, phi: f32, phi2: f32) -> Quaternion<f32> {
    let half_phi = phi * 0.5;
    let sum = (phi1 + phi2) * 0.5;
    let diff = (phi1 - phi2) * 0.5;
    Quaternion::new(
        half_phi.cos() * sum.cos(),
        half_phi.sin() * diff.cos(),
        half_phi.sin() * diff.sin(),
        half_phi.cos() * sum.sin(),
    )
}

/// Extracts (angle, axis) from a unit quaternion.
///
/// The scalar part is clamped into [-1, 1] before the `acos`, so slightly
/// denormalized inputs stay finite. Degenerate rotations report
/// [`DEGENERATE_AXIS`].
pub fn to_axis_angle(q: &Quaternion<f32>) -> (f32, Vector3<f32>) {
    let w = q.w.clamp(-1.0, 1.0);
    let angle = 2.0 * w.acos();
    let v = Vector3::new(q.i, q.j, q.k);
    let norm = v.norm();
    if norm < 1e-12 {
        (angle, DEGENERATE_AXIS)
    } else {
        (angle, v / norm)
    }
}

/// Converts an (angle, axis) pair to a Rodrigues vector `tan(angle/2) * axis`.
/// Used by the colony-relationship test, which is specified in Rodrigues
/// space.
pub fn axis_angle_to_rodrigues(angle: f32, axis: Vector3<f32>) -> Vector3<f32> {
    axis * (angle * 0.5).tan()
}

/// Returns the symmetry-equivalent of `q` closest to `reference`, i.e. the
/// candidate `±(q * s)` over all operators `s` maximizing the quaternion dot
/// product with `reference`.
///
/// Accumulating these instead of the raw voxel quaternions keeps a grain's
/// running orientation sum from cancelling across the symmetry fundamental
/// zone.
pub fn nearest_equivalent(
    reference: &Quaternion<f32>,
    q: &Quaternion<f32>,
    operators: &[[f32; 4]],
) -> Quaternion<f32> {
    let mut best = *q;
    let mut best_dot = f32::NEG_INFINITY;
    for op in operators {
        let s = Quaternion::new(op[3], op[0], op[1], op[2]);
        let candidate = (*q) * s;
        let dot = reference.w * candidate.w
            + reference.i * candidate.i
            + reference.j * candidate.j
            + reference.k * candidate.k;
        if dot.abs() > best_dot {
            best_dot = dot.abs();
            best = if dot < 0.0 { -candidate } else { candidate };
        }
    }
    best
}
