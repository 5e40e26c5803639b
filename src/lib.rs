//! rust_zipf — Hurwitz zeta evaluation and discrete power-law inference.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the zeta evaluator and the power-law harness to Python via the
//! `_rust_zipf` extension module (feature `python-bindings`).
//!
//! Key behaviors
//! -------------
//! - [`zeta`]: ζ(α, q) and ∂ζ/∂α from direct summation plus an
//!   Euler–Maclaurin tail, with truncation-error estimates.
//! - [`reference`] and [`comparison`]: independent quadrature oracles and
//!   the grid sweep that validates the evaluator against them.
//! - [`power_law`]: the discrete power law, synthetic datasets, Gamma-prior
//!   posterior, maximum likelihood fit and the recovery experiment.
//! - [`sampler`]: the posterior-sampler boundary and its HMC implementation.
//! - [`optimization`] and [`inference`]: L-BFGS maximization through argmin
//!   and observed-information standard errors.
//! - [`statistical_tests`]: χ² goodness of fit for generated datasets.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work lives in the inner modules; the PyO3 items in
//!   this file only convert inputs, dispatch and map errors.
//! - The library never installs a `tracing` subscriber; binaries and tests
//!   decide where events go.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_zipf::power_law::{CompiledModel, DiscretePowerLaw, FrequencyTable, GammaPrior};
//!
//! let law = DiscretePowerLaw::new(2.0, 1)?;
//! let data = law.sample(500, 3)?;
//! let table = FrequencyTable::from_dataset(&data)?;
//! let mle = CompiledModel::global().fit_mle(&table)?;
//! assert!(mle.alpha > 1.0);
//! # let _ = GammaPrior::default();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to the code they cover; `tests/` holds the
//!   oracle-accuracy sweep and the end-to-end power-law pipeline.
//! - The Python surface is exercised from Python.

pub mod comparison;
pub mod inference;
pub mod optimization;
pub mod power_law;
pub mod reference;
pub mod sampler;
pub mod statistical_tests;
pub mod utils;
pub mod zeta;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    power_law::{
        CompiledModel, DiscretePowerLaw, FrequencyTable, GammaPrior, MleFit, PosteriorFit,
    },
    sampler::PosteriorSummary,
    statistical_tests::{DEFAULT_MIN_EXPECTED, GofOutcome},
    utils::{extract_f64_array, extract_hmc, extract_mle_opts, extract_u64_values},
    zeta::{HurwitzZeta, ZetaEvaluation},
};

/// `hurwitz_zeta(alpha, q)` — `(ζ(α, q), ∂ζ/∂α)` with the default
/// truncation configuration. Use `evaluate_zeta` for the near-pole and
/// convergence flags.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(alpha, q, /)")]
pub fn hurwitz_zeta(alpha: f64, q: f64) -> PyResult<(f64, f64)> {
    Ok(HurwitzZeta::default().value_and_derivative(alpha, q)?)
}

/// ZetaEvaluation — full result of one evaluation, including the
/// `near_pole` and `converged` flags that `hurwitz_zeta` drops.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "ZetaEvaluation", module = "rust_zipf.zeta", frozen)]
#[derive(Debug, Clone, Copy)]
pub struct PyZetaEvaluation {
    inner: ZetaEvaluation,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyZetaEvaluation {
    #[getter]
    pub fn alpha(&self) -> f64 {
        self.inner.alpha
    }

    #[getter]
    pub fn q(&self) -> f64 {
        self.inner.q
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn derivative(&self) -> f64 {
        self.inner.derivative
    }

    #[getter]
    pub fn terms(&self) -> usize {
        self.inner.terms
    }

    #[getter]
    pub fn rel_error(&self) -> f64 {
        self.inner.rel_error
    }

    /// True when α is within the pole threshold of 1; the value is a
    /// best-effort estimate.
    #[getter]
    pub fn near_pole(&self) -> bool {
        self.inner.near_pole
    }

    /// False when the term budget ran out before the tolerance was met.
    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    fn __repr__(&self) -> String {
        format!(
            "ZetaEvaluation(alpha={}, q={}, value={}, derivative={}, near_pole={}, converged={})",
            self.inner.alpha,
            self.inner.q,
            self.inner.value,
            self.inner.derivative,
            self.inner.near_pole,
            self.inner.converged
        )
    }
}

/// `evaluate_zeta(alpha, q)` — the full [`ZetaEvaluation`] with its
/// diagnostic flags.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(alpha, q, /)")]
pub fn evaluate_zeta(alpha: f64, q: f64) -> PyResult<PyZetaEvaluation> {
    Ok(PyZetaEvaluation { inner: HurwitzZeta::default().evaluate(alpha, q)? })
}

/// `hurwitz_zeta_grid(alphas, q)` — values and derivatives for every α at a
/// single offset, as two float64 arrays.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(alphas, q, /)")]
pub fn hurwitz_zeta_grid<'py>(
    py: Python<'py>, alphas: &Bound<'py, PyAny>, q: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let arr = extract_f64_array(py, alphas)?;
    let alphas: Vec<f64> = arr.as_array().to_vec();
    let evaluator = HurwitzZeta::default();
    let pairs = py.allow_threads(|| {
        alphas
            .iter()
            .map(|&a| evaluator.value_and_derivative(a, q))
            .collect::<Result<Vec<_>, _>>()
    })?;
    let (values, derivatives): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    Ok((values.into_pyarray(py), derivatives.into_pyarray(py)))
}

/// PowerLaw — Python-facing wrapper for [`DiscretePowerLaw`].
///
/// Constructed as `PowerLaw(alpha, y_min, upper=None)`; `upper` truncates
/// the support at an inclusive bound.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_zipf.power_law")]
pub struct PowerLaw {
    inner: DiscretePowerLaw,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PowerLaw {
    #[new]
    #[pyo3(
        text_signature = "(alpha, y_min, /, upper=None)",
        signature = (alpha, y_min, upper = None)
    )]
    pub fn new(alpha: f64, y_min: u64, upper: Option<u64>) -> PyResult<Self> {
        let mut inner = DiscretePowerLaw::new(alpha, y_min)?;
        if let Some(b) = upper {
            inner = inner.with_upper_bound(b)?;
        }
        Ok(PowerLaw { inner })
    }

    #[getter]
    pub fn alpha(&self) -> f64 {
        self.inner.alpha()
    }

    #[getter]
    pub fn y_min(&self) -> u64 {
        self.inner.y_min()
    }

    #[getter]
    pub fn upper(&self) -> Option<u64> {
        self.inner.upper_bound()
    }

    #[getter]
    pub fn normalizer(&self) -> f64 {
        self.inner.normalizer()
    }

    pub fn pmf(&self, k: u64) -> f64 {
        self.inner.pmf(k)
    }

    pub fn ln_pmf(&self, k: u64) -> f64 {
        self.inner.ln_pmf(k)
    }

    /// `P(X >= k)`.
    pub fn sf(&self, k: u64) -> PyResult<f64> {
        Ok(self.inner.sf(k)?)
    }

    pub fn cdf(&self, k: u64) -> PyResult<f64> {
        Ok(self.inner.cdf(k)?)
    }

    #[pyo3(signature = (n, seed = 0))]
    pub fn sample(&self, py: Python<'_>, n: usize, seed: u64) -> PyResult<Vec<u64>> {
        let inner = self.inner;
        let data = py.allow_threads(move || inner.sample(n, seed))?;
        Ok(data.values().to_vec())
    }
}

/// PowerLawFit — posterior summary and maximum likelihood fit of α.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_zipf.power_law")]
pub struct PowerLawFit {
    summary: PosteriorSummary,
    mle: Option<MleFit>,
    draws: Vec<f64>,
}

#[cfg(feature = "python-bindings")]
impl From<PosteriorFit> for PowerLawFit {
    fn from(fit: PosteriorFit) -> Self {
        PowerLawFit { summary: fit.summary, mle: fit.mle, draws: fit.draws.pooled() }
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PowerLawFit {
    #[getter]
    pub fn mean(&self) -> f64 {
        self.summary.mean
    }

    #[getter]
    pub fn sd(&self) -> f64 {
        self.summary.sd
    }

    #[getter]
    pub fn q05(&self) -> f64 {
        self.summary.q05
    }

    #[getter]
    pub fn median(&self) -> f64 {
        self.summary.median
    }

    #[getter]
    pub fn q95(&self) -> f64 {
        self.summary.q95
    }

    #[getter]
    pub fn r_hat(&self) -> f64 {
        self.summary.r_hat
    }

    #[getter]
    pub fn ess(&self) -> f64 {
        self.summary.ess
    }

    #[getter]
    pub fn divergences(&self) -> usize {
        self.summary.divergences
    }

    #[getter]
    pub fn mle_alpha(&self) -> Option<f64> {
        self.mle.map(|m| m.alpha)
    }

    #[getter]
    pub fn mle_se(&self) -> Option<f64> {
        self.mle.map(|m| m.se)
    }

    #[getter]
    pub fn mle_converged(&self) -> Option<bool> {
        self.mle.map(|m| m.converged)
    }

    /// Pooled draws of α, chain by chain.
    #[getter]
    pub fn draws<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.draws.clone().into_pyarray(py)
    }
}

/// `fit_power_law(data, y_min, ...)` — posterior inference for α.
///
/// Without sampler or optimizer arguments the process-wide compiled model
/// is used; otherwise a model with the requested options is built for this
/// call.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        data,
        y_min,
        prior_shape = 0.5,
        prior_rate = 1.0,
        seed = 0,
        chains = None,
        warmup = None,
        draws = None,
        tol_grad = None,
        max_iter = None,
        line_searcher = None,
    ),
    text_signature = "(data, y_min, /, prior_shape=0.5, prior_rate=1.0, seed=0, chains=None, \
                      warmup=None, draws=None, tol_grad=None, max_iter=None, line_searcher=None)"
)]
pub fn fit_power_law<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, y_min: u64, prior_shape: f64, prior_rate: f64,
    seed: u64, chains: Option<usize>, warmup: Option<usize>, draws: Option<usize>,
    tol_grad: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
) -> PyResult<PowerLawFit> {
    let values = extract_u64_values(data)?;
    let table = FrequencyTable::from_values(&values, y_min)?;
    let prior = GammaPrior::new(prior_shape, prior_rate)?;

    let hmc = extract_hmc(chains, warmup, draws)?;
    let custom_mle = tol_grad.is_some() || max_iter.is_some() || line_searcher.is_some();
    let fit = if hmc.is_none() && !custom_mle {
        py.allow_threads(|| CompiledModel::global().infer(&table, prior, seed))?
    } else {
        let global = CompiledModel::global();
        let mle = extract_mle_opts(tol_grad, None, max_iter, line_searcher, None)?;
        let model = CompiledModel::new(*global.evaluator(), hmc.unwrap_or(*global.hmc()), mle);
        py.allow_threads(|| model.infer(&table, prior, seed))?
    };
    Ok(fit.into())
}

/// GoodnessOfFit — χ² test of integer data against a power law.
///
/// Constructed as `GoodnessOfFit(data, alpha, y_min, upper=None,
/// min_expected=5.0)`; no parameters are treated as estimated.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_zipf.statistical_tests")]
pub struct GoodnessOfFit {
    inner: GofOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GoodnessOfFit {
    #[new]
    #[pyo3(
        text_signature = "(data, alpha, y_min, /, upper=None, min_expected=5.0)",
        signature = (data, alpha, y_min, upper = None, min_expected = DEFAULT_MIN_EXPECTED)
    )]
    pub fn new(
        data: &Bound<'_, PyAny>, alpha: f64, y_min: u64, upper: Option<u64>, min_expected: f64,
    ) -> PyResult<Self> {
        let values = extract_u64_values(data)?;
        let mut law = DiscretePowerLaw::new(alpha, y_min)?;
        if let Some(b) = upper {
            law = law.with_upper_bound(b)?;
        }
        let inner = GofOutcome::chi_squared(&values, y_min, |k| law.pmf(k), min_expected, 0)?;
        Ok(GoodnessOfFit { inner })
    }

    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.stat()
    }

    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p_value()
    }

    #[getter]
    pub fn dof(&self) -> usize {
        self.inner.dof()
    }

    #[getter]
    pub fn bins(&self) -> usize {
        self.inner.bins()
    }
}

/// _rust_zipf — PyO3 module initializer.
///
/// Creates the `zeta`, `power_law` and `statistical_tests` submodules,
/// attaches them to `_rust_zipf` and registers them in `sys.modules` so
/// dotted imports work from Python.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_zipf<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let zeta_mod = PyModule::new(_py, "zeta")?;
    let power_law_mod = PyModule::new(_py, "power_law")?;
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    zeta_functions(m, &zeta_mod)?;
    power_law_models(m, &power_law_mod)?;
    statistical_tests(m, &statistical_tests_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_zipf.zeta", zeta_mod)?;
    modules.set_item("rust_zipf.power_law", power_law_mod)?;
    modules.set_item("rust_zipf.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn zeta_functions<'py>(
    rust_zipf: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(hurwitz_zeta, m)?)?;
    m.add_function(wrap_pyfunction!(hurwitz_zeta_grid, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_zeta, m)?)?;
    m.add_class::<PyZetaEvaluation>()?;
    rust_zipf.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn power_law_models<'py>(
    rust_zipf: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PowerLaw>()?;
    m.add_class::<PowerLawFit>()?;
    m.add_function(wrap_pyfunction!(fit_power_law, m)?)?;
    rust_zipf.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    rust_zipf: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<GoodnessOfFit>()?;
    rust_zipf.add_submodule(m)?;
    Ok(())
}
