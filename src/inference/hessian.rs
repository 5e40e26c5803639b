//! inference::hessian — covariance and standard errors from observed information.
//!
//! Purpose
//! -------
//! Turn the gradient of a log-likelihood into the Laplace approximation at
//! the MLE: the observed information `J(θ̂) = -∇²ℓ(θ̂)` is built by finite
//! differences of the analytic gradient, and its eigen-pseudoinverse is the
//! asymptotic covariance of `θ̂`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `grad` is the gradient of the **summed** log-likelihood, so the
//!   returned covariance is already on the sample scale (no `1/n`).
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped from the
//!   pseudoinverse; if nothing survives the information is singular and an
//!   error is returned instead of a zero covariance.
//! - No explicit inverse is formed.

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        finite_diff::compute_hessian,
        types::{Grad, Hessian, Theta},
    },
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Observed information `-∇²ℓ(θ̂)` from the gradient of `ℓ`.
///
/// # Errors
/// - Any error from [`compute_hessian`] (non-finite entries).
pub fn observed_information<F: Fn(&Theta) -> Grad>(
    grad: &F, theta_hat: &Theta,
) -> OptResult<Hessian> {
    Ok(-compute_hessian(grad, theta_hat)?)
}

/// Moore–Penrose inverse of a symmetric information matrix.
///
/// # Errors
/// - [`OptError::SingularInformation`] if no eigenvalue exceeds [`EIGEN_EPS`].
pub fn covariance_from_information(info: &Hessian) -> OptResult<Array2<f64>> {
    let n = info.nrows();
    let eigen = to_dmatrix(info).symmetric_eigen();
    let max_eigenvalue = eigen.eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_eigenvalue.is_nan() || max_eigenvalue <= EIGEN_EPS {
        return Err(OptError::SingularInformation { max_eigenvalue });
    }

    let q = &eigen.eigenvectors;
    let cov = Array2::from_shape_fn((n, n), |(i, j)| {
        eigen
            .eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(j, k)] / lambda)
            .sum()
    });
    Ok(cov)
}

/// Classical standard errors `sqrt(diag(J(θ̂)⁺))`.
///
/// # Errors
/// - Errors from [`observed_information`] and
///   [`covariance_from_information`].
pub fn calc_standard_errors<F: Fn(&Theta) -> Grad>(
    grad: &F, theta_hat: &Theta,
) -> OptResult<Array1<f64>> {
    let cov = covariance_from_information(&observed_information(grad, theta_hat)?)?;
    Ok(cov.diag().mapv(f64::sqrt))
}

fn to_dmatrix(m: &Hessian) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}
