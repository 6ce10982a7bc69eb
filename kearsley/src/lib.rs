//! kearsley - Optimal rigid superposition of corresponding 3D point sets
//!
//! This crate computes the rotation and translation that minimise the
//! root-mean-square deviation (RMSD) between two ordered point sets, using
//! Kearsley's quaternion formulation:
//!
//! - **Best fit** - minimal RMSD and optimal rotation from one 4x4 symmetric
//!   eigendecomposition
//! - **Quaternion** - scalar-first rotation intermediate
//! - **Transform** - rotation/translation recovery and application to a point set
//!
//! Point sets are `ndarray::Array2<f64>` with shape [n_points, 3]; row `i` of the
//! reference corresponds to row `i` of the mobile set.
//!
//! # Example
//!
//! ```
//! use kearsley::{apply_transform, rmsd, rot_trans};
//! use ndarray::array;
//!
//! let reference = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//! let mobile = &reference + &array![[1.0, 2.0, 3.0]];
//!
//! let deviation = rmsd(&reference, &mobile).unwrap();
//! assert!(deviation < 1e-6);
//!
//! let (_rotation, translation) = rot_trans(&reference, &mobile).unwrap();
//! assert!((translation.x - 1.0).abs() < 1e-9);
//!
//! let aligned = apply_transform(&reference, &mobile).unwrap();
//! assert!((&aligned - &reference).iter().all(|d| d.abs() < 1e-9));
//! ```

pub mod bestfit;
pub mod quaternion;

// Re-export commonly used types
pub use bestfit::{
    apply_transform, bestfit, bestfit_objects, points_to_array, rmsd, rot_trans, ArgumentError,
    BestFit, KearsleyError, Locatable3d,
};
pub use quaternion::Quaternion;
