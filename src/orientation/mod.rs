//! Orientation math for the reconstruction pipeline.
//!
//! Two concerns live here:
//!
//! - [`quat`] — conversions between orientation representations (Euler,
//!   axis-angle, Rodrigues) on top of `nalgebra::Quaternion`, plus the
//!   nearest-equivalent helper used when accumulating grain average
//!   orientations.
//! - [`symmetry`] — crystal point-group operator tables and the
//!   minimum-disorientation computation. Each [`CrystalSymmetry`] variant
//!   carries a fixed, ordered set of equivalent rotation quaternions
//!   (24 for cubic, 12 for hexagonal, 4 for orthorhombic).
//!
//! Everything in this module is a pure function: a degenerate input
//! (zero-angle rotation, zero-norm axis) has a defined fallback, never an
//! error. Angles are radians throughout; degree/radian conversion happens at
//! the configuration boundary only.

pub mod quat;
pub mod symmetry;

pub use symmetry::{misorientation, CrystalSymmetry, Misorientation};
