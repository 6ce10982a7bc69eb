//! Centering and Kearsley matrix assembly.
//!
//! Given two centered point sets, builds the symmetric 4x4 matrix whose
//! smallest eigenpair encodes the minimal RMSD and the optimal rotation.

use nalgebra::{Matrix3, Matrix4, Vector3};
use ndarray::Array2;

/// Converts ndarray point representation to nalgebra Vector3 format.
///
/// Input must have shape [n_points, 3] where each row is [x, y, z].
pub(super) fn convert_to_vector3_points(points: &Array2<f64>) -> Vec<Vector3<f64>> {
    points
        .rows()
        .into_iter()
        .map(|row| Vector3::new(row[0], row[1], row[2]))
        .collect()
}

/// Calculates the geometric centroid (center of mass) of a point set.
///
/// Callers guarantee the set is non-empty.
pub(super) fn calculate_centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    let mut centroid = Vector3::zeros();
    for point in points {
        centroid += point;
    }

    centroid / points.len() as f64
}

/// Subtracts `centroid` from every point.
pub(super) fn center_points(points: &[Vector3<f64>], centroid: &Vector3<f64>) -> Vec<Vector3<f64>> {
    points.iter().map(|p| p - centroid).collect()
}

/// Assembles the Kearsley matrix from centered point sets `x` and `y`.
///
/// With `d = x - y` and `s = x + y`, every entry is a combination of the dot
/// products `d_a·d_b`, `s_a·s_b` and `d_a·s_b` over the points. The row/column
/// assignment pairs with the scalar-first quaternion layout of
/// [`crate::Quaternion::to_rotation_matrix`] and must not be permuted.
pub(super) fn kearsley_matrix(x: &[Vector3<f64>], y: &[Vector3<f64>]) -> Matrix4<f64> {
    // dd[(a, b)] = d_a·d_b, ss[(a, b)] = s_a·s_b, ds[(a, b)] = d_a·s_b
    let mut dd = Matrix3::zeros();
    let mut ss = Matrix3::zeros();
    let mut ds = Matrix3::zeros();

    for (xi, yi) in x.iter().zip(y) {
        let d = xi - yi;
        let s = xi + yi;

        dd += d * d.transpose();
        ss += s * s.transpose();
        ds += d * s.transpose();
    }

    let mut k = Matrix4::zeros();

    k[(0, 0)] = dd[(0, 0)] + dd[(1, 1)] + dd[(2, 2)];

    k[(1, 0)] = ds[(2, 1)] - ds[(1, 2)];
    k[(1, 1)] = ss[(1, 1)] + ss[(2, 2)] + dd[(0, 0)];

    k[(2, 0)] = ds[(0, 2)] - ds[(2, 0)];
    k[(2, 1)] = dd[(0, 1)] - ss[(0, 1)];
    k[(2, 2)] = ss[(0, 0)] + ss[(2, 2)] + dd[(1, 1)];

    k[(3, 0)] = ds[(1, 0)] - ds[(0, 1)];
    k[(3, 1)] = dd[(0, 2)] - ss[(0, 2)];
    k[(3, 2)] = dd[(1, 2)] - ss[(1, 2)];
    k[(3, 3)] = ss[(0, 0)] + ss[(1, 1)] + dd[(2, 2)];

    k.fill_upper_triangle_with_lower_triangle();
    k
}
