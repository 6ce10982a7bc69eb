//! Scalar-first quaternion used as the rotation intermediate of the best fit
//!
//! The components follow the `(w, x, y, z)` layout, with `w` the scalar part.
//! Only the operations needed to turn an eigenvector of the Kearsley matrix
//! into a rotation matrix are provided.

use nalgebra::{Matrix3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A quaternion representing a rotation in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Real/scalar component (w)
    pub w: f64,
    /// First complex component (i)
    pub x: f64,
    /// Second complex component (j)
    pub y: f64,
    /// Third complex component (k)
    pub z: f64,
}

impl Quaternion {
    /// Create a new quaternion
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Create an identity quaternion (no rotation)
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build from a 4-vector laid out as `[w, x, y, z]`.
    pub fn from_vector4(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Create a quaternion from axis-angle representation
    ///
    /// The axis is expected to be unit length.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let half_angle = angle / 2.0;
        let sin_half_angle = half_angle.sin();

        Self {
            w: half_angle.cos(),
            x: axis[0] * sin_half_angle,
            y: axis[1] * sin_half_angle,
            z: axis[2] * sin_half_angle,
        }
    }

    /// Components as `[w, x, y, z]`.
    pub fn to_vector4(&self) -> Vector4<f64> {
        Vector4::new(self.w, self.x, self.y, self.z)
    }

    /// Calculate the norm (magnitude) of the quaternion
    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalize the quaternion to unit length
    pub fn normalize(&self) -> Self {
        let norm = self.norm();
        if norm.abs() < 1e-10 {
            Self::identity()
        } else {
            Self::new(self.w / norm, self.x / norm, self.y / norm, self.z / norm)
        }
    }

    /// Convert to the 3x3 rotation matrix used by the superposition routines.
    ///
    /// This is the frame (passive) form: for a quaternion built with
    /// [`Quaternion::from_axis_angle`] the result is the transpose of the
    /// active rotation about that axis. It is invariant under `q -> -q`, and
    /// orthogonal with determinant +1 whenever `self` has unit norm.
    pub fn to_rotation_matrix(&self) -> Matrix3<f64> {
        let (q1, q2, q3, q4) = (self.w, self.x, self.y, self.z);

        let q11 = q1 * q1;
        let q22 = q2 * q2;
        let q33 = q3 * q3;
        let q44 = q4 * q4;

        Matrix3::new(
            q11 + q22 - q33 - q44,
            2.0 * (q2 * q3 + q1 * q4),
            2.0 * (q2 * q4 - q1 * q3),
            2.0 * (q2 * q3 - q1 * q4),
            q11 + q33 - q22 - q44,
            2.0 * (q3 * q4 + q1 * q2),
            2.0 * (q2 * q4 + q1 * q3),
            2.0 * (q3 * q4 - q1 * q2),
            q11 + q44 - q22 - q33,
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}
