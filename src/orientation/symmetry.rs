//! Crystal point-group symmetry and minimum-disorientation computation.
//!
//! Operator tables are fixed constants per crystal class, stored as
//! `[x, y, z, w]` quaternions. The misorientation between two orientations is
//! the minimum rotation angle of `conj(q2) * q1 * s` over all operators `s`
//! of the active class, wrapped into [0, π].

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::quat::{self, DEGENERATE_AXIS};

const FRAC_1_SQRT_2: f32 = 0.707_106_78;
const SIN_60: f32 = 0.866_025_4;

#[rustfmt::skip]
const CUBIC_OPERATORS: [[f32; 4]; 24] = [
    [ 0.0,           0.0,           0.0,          1.0],
    [ 1.0,           0.0,           0.0,          0.0],
    [ 0.0,           1.0,           0.0,          0.0],
    [ 0.0,           0.0,           1.0,          0.0],
    [ FRAC_1_SQRT_2, 0.0,           0.0,          FRAC_1_SQRT_2],
    [ 0.0,           FRAC_1_SQRT_2, 0.0,          FRAC_1_SQRT_2],
    [ 0.0,           0.0,           FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, 0.0,           0.0,          FRAC_1_SQRT_2],
    [ 0.0,          -FRAC_1_SQRT_2, 0.0,          FRAC_1_SQRT_2],
    [ 0.0,           0.0,          -FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [ FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0,          0.0],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0,          0.0],
    [ 0.0,           FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [ 0.0,          -FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [ FRAC_1_SQRT_2, 0.0,           FRAC_1_SQRT_2, 0.0],
    [-FRAC_1_SQRT_2, 0.0,           FRAC_1_SQRT_2, 0.0],
    [ 0.5,  0.5,  0.5, 0.5],
    [-0.5, -0.5, -0.5, 0.5],
    [ 0.5, -0.5,  0.5, 0.5],
    [-0.5,  0.5, -0.5, 0.5],
    [-0.5,  0.5,  0.5, 0.5],
    [ 0.5, -0.5, -0.5, 0.5],
    [-0.5, -0.5,  0.5, 0.5],
    [ 0.5,  0.5, -0.5, 0.5],
];

#[rustfmt::skip]
const HEXAGONAL_OPERATORS: [[f32; 4]; 12] = [
    [ 0.0,    0.0,    0.0,     1.0],
    [ 0.0,    0.0,    0.5,     SIN_60],
    [ 0.0,    0.0,    SIN_60,  0.5],
    [ 0.0,    0.0,    1.0,     0.0],
    [ 0.0,    0.0,    SIN_60, -0.5],
    [ 0.0,    0.0,    0.5,    -SIN_60],
    [ 1.0,    0.0,    0.0,     0.0],
    [ SIN_60, 0.5,    0.0,     0.0],
    [ 0.5,    SIN_60, 0.0,     0.0],
    [ 0.0,    1.0,    0.0,     0.0],
    [-0.5,    SIN_60, 0.0,     0.0],
    [-SIN_60, 0.5,    0.0,     0.0],
];

#[rustfmt::skip]
const ORTHORHOMBIC_OPERATORS: [[f32; 4]; 4] = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
];

/// Crystal classes supported by the reconstruction core.
///
/// Each variant carries a fixed, immutable ordered operator set; tables are
/// process-wide constants, safe to share across all stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalSymmetry {
    Cubic,
    Hexagonal,
    Orthorhombic,
}

impl CrystalSymmetry {
    /// The point-group operator table as `[x, y, z, w]` quaternions.
    pub fn operators(&self) -> &'static [[f32; 4]] {
        match self {
            CrystalSymmetry::Cubic => &CUBIC_OPERATORS,
            CrystalSymmetry::Hexagonal => &HEXAGONAL_OPERATORS,
            CrystalSymmetry::Orthorhombic => &ORTHORHOMBIC_OPERATORS,
        }
    }

    /// Number of symmetry operators (24 cubic, 12 hexagonal, 4 orthorhombic).
    pub fn operator_count(&self) -> usize {
        self.operators().len()
    }
}

/// Minimum disorientation between two orientations: rotation angle in
/// [0, π] radians and the normalized rotation axis achieving it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Misorientation {
    pub angle: f32,
    pub axis: Vector3<f32>,
}

/// Computes the minimum disorientation between `q1` and `q2` under
/// `symmetry`.
///
/// For every operator `s` the relative rotation `conj(q2) * q1 * s` is
/// reduced to axis-angle form (angles beyond π reflect to `2π − angle`) and
/// the operator with the smallest angle wins. A degenerate winning axis
/// (zero rotation) reports (0, 0, 1).
pub fn misorientation(
    q1: &Quaternion<f32>,
    q2: &Quaternion<f32>,
    symmetry: CrystalSymmetry,
) -> Misorientation {
    let relative = q2.conjugate() * *q1;
    let mut min_angle = f32::INFINITY;
    let mut min_axis = DEGENERATE_AXIS;
    for op in symmetry.operators() {
        let s = Quaternion::new(op[3], op[0], op[1], op[2]);
        let qc = relative * s;
        let (mut angle, axis) = quat::to_axis_angle(&qc);
        if angle > std::f32::consts::PI {
            angle = 2.0 * std::f32::consts::PI - angle;
        }
        if angle < min_angle {
            min_angle = angle;
            min_axis = axis;
        }
    }
    if min_angle <= f32::EPSILON {
        min_axis = DEGENERATE_AXIS;
    }
    Misorientation {
        angle: min_angle,
        axis: min_axis,
    }
}
