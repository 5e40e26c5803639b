//! loglik_optimizer::solver — L-BFGS construction and the `maximize` driver.
//!
//! Purpose
//! -------
//! Turn [`MLEOptions`] into a configured argmin L-BFGS solver (More–Thuente
//! or Hager–Zhang line search), run it from `θ₀` and convert argmin's final
//! state into an [`OptimOutcome`].
//!
//! Conventions
//! -----------
//! - `max_iter` is applied on the executor state, gradient and cost
//!   tolerances on the solver.
//! - With feature `obs_slog` and `verbose = true`, argmin's slog observer is
//!   attached and the starting point is logged through `tracing`.

use argmin::{
    core::{Executor, IterState, Solver, State},
    solver::quasinewton::LBFGS,
};
use tracing::debug;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HZ_MAX_STEP, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Theta,
        },
    },
};

/// Maximize `ℓ(θ)` starting at `theta0`.
///
/// # Errors
/// - Whatever `f.check` rejects at `theta0`.
/// - Invalid tolerances rejected by argmin.
/// - Model errors raised during the run, recovered as the original
///   [`OptError`](crate::optimization::errors::OptError).
/// - `MissingThetaHat` / `InvalidThetaHat` / `NonFiniteCost` if the final
///   state is unusable.
/// - `LineSearchFailed` if L-BFGS exited because its line search failed.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let ls = HagerZhangLS::new().with_bounds(f64::EPSILON, HZ_MAX_STEP)?;
            let solver = configure_lbfgs(LbfgsHagerZhang::new(ls, mem), opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Apply the gradient and cost tolerances of `opts` to an L-BFGS solver.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    if opts.verbose {
        debug!(theta0 = ?theta0.as_slice(), "starting L-BFGS");
    }

    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        );
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{traits::Tolerances, types::Theta},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Both line searches on a smooth concave objective, with and without an
    //   analytic gradient.
    // - Rejection at `check` before the solver runs.
    // - A line search that cannot evaluate its trial points surfaces as an
    //   error instead of returning the start value.
    //
    // They intentionally DO NOT cover:
    // - The power-law likelihood (power_law::posterior tests).
    // -------------------------------------------------------------------------

    // ℓ(θ) = n·(θ·m - e^θ), maximized at θ = ln m.
    struct ExpFamily {
        analytic: bool,
    }

    impl LogLikelihood for ExpFamily {
        type Data = (f64, f64);

        fn value(&self, theta: &Theta, &(n, m): &(f64, f64)) -> OptResult<f64> {
            Ok(n * (theta[0] * m - theta[0].exp()))
        }

        fn check(&self, _theta: &Theta, &(n, _): &(f64, f64)) -> OptResult<()> {
            if n <= 0.0 { Err(OptError::EmptyData) } else { Ok(()) }
        }

        fn grad(&self, theta: &Theta, &(n, m): &(f64, f64)) -> OptResult<Grad> {
            if self.analytic {
                Ok(array![n * (m - theta[0].exp())])
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches reach the analytic maximizer.
    //
    // Given
    // -----
    // - ℓ(θ) = 50(3θ - e^θ), θ₀ = 0, analytic and numerical gradients.
    //
    // Expect
    // ------
    // - θ̂ = ln 3 to 1e-6, converged, ℓ(θ̂) = 50(3 ln 3 - 3).
    fn maximize_recovers_closed_form_optimum() {
        // Arrange
        let data = (50.0, 3.0);
        for analytic in [true, false] {
            for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
                let opts = MLEOptions::new(
                    Tolerances::new(Some(1e-9), None, Some(200)).expect("valid tolerances"),
                    searcher,
                    false,
                    None,
                )
                .expect("valid options");

                // Act
                let out = maximize(&ExpFamily { analytic }, array![0.0], &data, &opts)
                    .expect("optimizer runs");

                // Assert
                assert_relative_eq!(out.theta_hat[0], 3.0_f64.ln(), epsilon = 1e-6);
                assert_relative_eq!(out.value, 50.0 * (3.0 * 3.0_f64.ln() - 3.0), epsilon = 1e-8);
                assert!(out.converged, "{searcher:?} analytic={analytic}: {}", out.status);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs first and its error is returned unchanged.
    //
    // Given
    // -----
    // - n = 0 in the data payload.
    //
    // Expect
    // ------
    // - Err(EmptyData).
    fn check_failure_short_circuits() {
        // Act
        let model = ExpFamily { analytic: true };
        let out = maximize(&model, array![0.0], &(0.0, 3.0), &MLEOptions::default());

        // Assert
        assert_eq!(out, Err(OptError::EmptyData));
    }

    // ℓ(θ) = -2θ² on (-1, 1) and -∞ outside.
    struct Walled;

    impl LogLikelihood for Walled {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            let t = theta[0];
            Ok(if t.abs() < 1.0 { -2.0 * t * t } else { f64::NEG_INFINITY })
        }

        fn check(&self, _theta: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-4.0 * theta[0]])
        }
    }

    #[test]
    // Purpose
    // -------
    // A failed line search is reported as an error, never as an estimate
    // equal to the starting point.
    //
    // Given
    // -----
    // - ℓ(θ) = -2θ² on (-1, 1), -∞ outside; θ₀ = 0.5, so the unit trial
    //   step of the first Hager–Zhang bracket lands at θ = -1.5.
    //
    // Expect
    // ------
    // - Err(LineSearchFailed).
    fn line_search_failure_is_an_error() {
        // Arrange
        let opts = MLEOptions::new(Tolerances::default(), LineSearcher::HagerZhang, false, None)
            .expect("valid options");

        // Act
        let out = maximize(&Walled, array![0.5], &(), &opts);

        // Assert
        assert!(matches!(out, Err(OptError::LineSearchFailed { .. })), "{out:?}");
    }
}
