//! Optimal rigid superposition of two corresponding 3D point sets
//!
//! Implements Kearsley's quaternion method: both point sets are centered, a
//! symmetric 4x4 matrix is assembled from their sums and differences, and its
//! smallest eigenpair gives the minimal RMSD together with the optimal
//! rotation as a unit quaternion. Row `i` of the reference set corresponds to
//! row `i` of the mobile set.
//!
//! Every entry point recomputes the fit from scratch and leaves its inputs
//! untouched.

mod eigen;
mod matrix;

use nalgebra::{Matrix3, Vector3};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quaternion::Quaternion;
use eigen::sorted_symmetric_eigen;
use matrix::{calculate_centroid, center_points, convert_to_vector3_points, kearsley_matrix};

/// The specific argument check that rejected a call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("reference points must have shape [n_points, 3], got {0} columns")]
    ReferenceColumns(usize),

    #[error("mobile points must have shape [n_points, 3], got {0} columns")]
    MobileColumns(usize),

    #[error("point sets must have the same number of rows, got {reference} reference and {mobile} mobile")]
    RowCountMismatch { reference: usize, mobile: usize },

    #[error("point sets must contain at least one point")]
    EmptyPointSet,
}

/// Errors that can occur during superposition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KearsleyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
}

/// Result of a best fit between a reference and a mobile point set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestFit {
    /// Root-mean-square deviation after optimal alignment
    pub rmsd: f64,

    /// Unit quaternion of the optimal rotation (sign is solver dependent)
    pub quaternion: Quaternion,

    /// Centroid of the reference points
    pub reference_centroid: [f64; 3],

    /// Centroid of the mobile points
    pub mobile_centroid: [f64; 3],

    /// Number of corresponding point pairs
    pub n_points: usize,
}

impl BestFit {
    /// Rotation matrix of the fit.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.quaternion.to_rotation_matrix()
    }

    /// Translation of the fit: `c(mobile) - R⁻¹ · c(reference)`.
    pub fn translation(&self) -> Vector3<f64> {
        let rotation = self.rotation();
        Vector3::from(self.mobile_centroid)
            - rotation.transpose() * Vector3::from(self.reference_centroid)
    }
}

fn validate_point_sets(
    reference: &Array2<f64>,
    mobile: &Array2<f64>,
) -> Result<(), ArgumentError> {
    let (reference_rows, reference_cols) = reference.dim();
    let (mobile_rows, mobile_cols) = mobile.dim();

    if reference_cols != 3 {
        return Err(ArgumentError::ReferenceColumns(reference_cols));
    }
    if mobile_cols != 3 {
        return Err(ArgumentError::MobileColumns(mobile_cols));
    }
    if reference_rows != mobile_rows {
        return Err(ArgumentError::RowCountMismatch {
            reference: reference_rows,
            mobile: mobile_rows,
        });
    }
    if reference_rows == 0 {
        return Err(ArgumentError::EmptyPointSet);
    }

    Ok(())
}

/// Computes the optimal superposition of `mobile` onto `reference`.
///
/// # Arguments
/// * `reference` - Reference points as `ndarray::Array2<f64>` with shape [n_points, 3]
/// * `mobile` - Mobile points with the same shape, row-wise corresponding to `reference`
///
/// # Returns
/// * `Result<BestFit, KearsleyError>` - Minimal RMSD, optimal quaternion and both centroids
///
/// # Errors
/// * `KearsleyError::InvalidArgument` - If either array does not have 3 columns, the row
///   counts differ, or the point sets are empty
pub fn bestfit(reference: &Array2<f64>, mobile: &Array2<f64>) -> Result<BestFit, KearsleyError> {
    if let Err(e) = validate_point_sets(reference, mobile) {
        log::debug!("rejecting best fit: {e}");
        return Err(e.into());
    }

    let reference_vec = convert_to_vector3_points(reference);
    let mobile_vec = convert_to_vector3_points(mobile);
    let n_points = reference_vec.len();

    let reference_centroid = calculate_centroid(&reference_vec);
    let mobile_centroid = calculate_centroid(&mobile_vec);

    let x = center_points(&reference_vec, &reference_centroid);
    let y = center_points(&mobile_vec, &mobile_centroid);

    let k = kearsley_matrix(&x, &y);
    log::trace!("Kearsley matrix: {k}");

    let eig = sorted_symmetric_eigen(&k);
    log::trace!("Kearsley eigenvalues: {:?}", eig.eigenvalues.as_slice());

    let (min_eigenvalue, q) = eig.smallest();
    // |.| absorbs round-off below an exact zero minimum
    let rmsd = (min_eigenvalue.abs() / n_points as f64).sqrt();
    log::debug!("best fit over {n_points} points: rmsd={rmsd:.6e}");

    Ok(BestFit {
        rmsd,
        quaternion: Quaternion::from_vector4(&q),
        reference_centroid: reference_centroid.into(),
        mobile_centroid: mobile_centroid.into(),
        n_points,
    })
}

/// Minimal root-mean-square deviation between `reference` and `mobile` after
/// optimal rigid alignment.
///
/// # Errors
/// * `KearsleyError::InvalidArgument` - See [`bestfit`]
pub fn rmsd(reference: &Array2<f64>, mobile: &Array2<f64>) -> Result<f64, KearsleyError> {
    Ok(bestfit(reference, mobile)?.rmsd)
}

/// Rotation and translation of the optimal superposition.
///
/// The pair satisfies `reference_i ≈ R · (mobile_i - t)`, with
/// `t = c(mobile) - R⁻¹ · c(reference)`.
///
/// # Errors
/// * `KearsleyError::InvalidArgument` - See [`bestfit`]
pub fn rot_trans(
    reference: &Array2<f64>,
    mobile: &Array2<f64>,
) -> Result<(Matrix3<f64>, Vector3<f64>), KearsleyError> {
    let fit = bestfit(reference, mobile)?;
    Ok((fit.rotation(), fit.translation()))
}

/// Applies the optimal superposition to `mobile`, returning a new
/// [n_points, 3] array best aligned to `reference`.
///
/// Each row becomes `R · (mobile_i - t)` with `(R, t)` from [`rot_trans`].
///
/// # Errors
/// * `KearsleyError::InvalidArgument` - See [`bestfit`]
pub fn apply_transform(
    reference: &Array2<f64>,
    mobile: &Array2<f64>,
) -> Result<Array2<f64>, KearsleyError> {
    let (rotation, translation) = rot_trans(reference, mobile)?;

    let transformed: Vec<Vector3<f64>> = convert_to_vector3_points(mobile)
        .iter()
        .map(|p| rotation * (p - translation))
        .collect();

    Ok(Array2::from_shape_fn((transformed.len(), 3), |(i, j)| transformed[i][j]))
}

/// Trait for objects that can be located in a 3D Cartesian coordinate system.
pub trait Locatable3d {
    /// Returns the x-coordinate of the object.
    fn x(&self) -> f64;

    /// Returns the y-coordinate of the object.
    fn y(&self) -> f64;

    /// Returns the z-coordinate of the object.
    fn z(&self) -> f64;
}

/// Implement Locatable for `nalgebra::Vector3<f64>`
impl Locatable3d for Vector3<f64> {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> f64 {
        self.z
    }
}

impl Locatable3d for [f64; 3] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }

    fn z(&self) -> f64 {
        self[2]
    }
}

/// Packs located objects into a [n_points, 3] array, one row per object.
pub fn points_to_array<P: Locatable3d>(points: &[P]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 3), |(i, j)| match j {
        0 => points[i].x(),
        1 => points[i].y(),
        _ => points[i].z(),
    })
}

/// Best fit between two slices of located objects, matched by index.
///
/// # Type Parameters
/// * `R1`: The type of the reference objects, must implement `Locatable3d`.
/// * `R2`: The type of the mobile objects, must implement `Locatable3d`.
///
/// # Errors
/// * `KearsleyError::InvalidArgument` - If the slices differ in length or are empty.
pub fn bestfit_objects<R1, R2>(reference: &[R1], mobile: &[R2]) -> Result<BestFit, KearsleyError>
where
    R1: Locatable3d,
    R2: Locatable3d,
{
    bestfit(&points_to_array(reference), &points_to_array(mobile))
}
