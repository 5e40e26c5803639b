//! loglik_optimizer::finite_diff — Hessians from an analytic gradient.
//!
//! [`compute_hessian`] differentiates a gradient function with `finitediff`,
//! trying the central stencil first and the forward stencil when the central
//! one produces a non-finite entry (e.g. a step that crosses a domain
//! boundary). The result is symmetrized before it is returned.

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::validate_hessian,
    },
};
use finitediff::FiniteDiff;

/// Hessian of the scalar whose gradient is `grad`, evaluated at `theta`.
///
/// # Errors
/// - [`OptError::InvalidHessian`](crate::optimization::errors::OptError::InvalidHessian)
///   if neither stencil yields finite entries.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(grad: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(grad);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(grad);
        validate_hessian(&hess, dim)?;
    }
    symmetrize(&mut hess);
    Ok(hess)
}

fn symmetrize(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    #[test]
    // Purpose
    // -------
    // The Hessian of a quadratic is recovered and symmetric.
    //
    // Given
    // -----
    // - f(x, y) = x² + 3xy + 2y², gradient (2x + 3y, 3x + 4y).
    //
    // Expect
    // ------
    // - [[2, 3], [3, 4]] to 1e-6 with exactly equal off-diagonals.
    fn quadratic_hessian_is_recovered() {
        // Arrange
        let grad = |t: &Theta| array![2.0 * t[0] + 3.0 * t[1], 3.0 * t[0] + 4.0 * t[1]];

        // Act
        let h = compute_hessian(&grad, &array![1.0, -2.0]).expect("finite Hessian");

        // Assert
        assert_relative_eq!(h[[0, 0]], 2.0, epsilon = 1e-6);
        assert_relative_eq!(h[[1, 1]], 4.0, epsilon = 1e-6);
        assert_relative_eq!(h[[0, 1]], 3.0, epsilon = 1e-6);
        assert_eq!(h[[0, 1]], h[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // A gradient that is NaN everywhere cannot be differentiated.
    //
    // Given
    // -----
    // - grad(θ) = [NaN].
    //
    // Expect
    // ------
    // - InvalidHessian.
    fn non_finite_gradient_is_rejected() {
        // Arrange
        let grad = |_: &Theta| Array1::from(vec![f64::NAN]);

        // Act
        let err = compute_hessian(&grad, &array![0.0]).expect_err("NaN Hessian");

        // Assert
        assert!(matches!(err, OptError::InvalidHessian { .. }));
    }
}
