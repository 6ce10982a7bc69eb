//! Symmetric eigendecomposition of the 4x4 Kearsley matrix.
//!
//! `nalgebra::SymmetricEigen` returns eigenpairs in no particular order, so the
//! pairs are re-sorted ascending by eigenvalue here. The first pair is the one
//! the best fit consumes.

use nalgebra::{Matrix4, SymmetricEigen, Vector4};

/// Iteration cap handed to the eigensolver. A 4x4 matrix converges in a
/// handful of sweeps; the cap only matters for non-finite input.
const MAX_EIGEN_ITERATIONS: usize = 1000;

/// Eigenpairs sorted ascending by eigenvalue.
///
/// Column `i` of `eigenvectors` is the unit eigenvector of `eigenvalues[i]`.
#[derive(Debug, Clone, Copy)]
pub(super) struct SortedEigen {
    pub eigenvalues: Vector4<f64>,
    pub eigenvectors: Matrix4<f64>,
}

impl SortedEigen {
    /// Smallest eigenvalue and its eigenvector.
    pub fn smallest(&self) -> (f64, Vector4<f64>) {
        (self.eigenvalues[0], self.eigenvectors.column(0).into_owned())
    }

    fn nan() -> Self {
        Self {
            eigenvalues: Vector4::repeat(f64::NAN),
            eigenvectors: Matrix4::repeat(f64::NAN),
        }
    }
}

/// Decomposes a real symmetric 4x4 matrix and sorts the eigenpairs ascending.
///
/// Non-finite input yields all-NaN output so that NaN/Inf coordinates surface
/// in the results instead of stalling the solver.
pub(super) fn sorted_symmetric_eigen(k: &Matrix4<f64>) -> SortedEigen {
    if !k.iter().all(|v| v.is_finite()) {
        return SortedEigen::nan();
    }

    let Some(eig) = SymmetricEigen::try_new(*k, f64::EPSILON, MAX_EIGEN_ITERATIONS) else {
        log::warn!("symmetric eigensolver did not converge in {MAX_EIGEN_ITERATIONS} iterations");
        return SortedEigen::nan();
    };

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

    SortedEigen {
        eigenvalues: Vector4::from_fn(|i, _| eig.eigenvalues[order[i]]),
        eigenvectors: Matrix4::from_fn(|row, col| eig.eigenvectors[(row, order[col])]),
    }
}
