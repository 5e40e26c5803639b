//! utils — Python-boundary helpers for the PyO3 bindings.
//!
//! Purpose
//! -------
//! Convert loosely typed Python inputs (NumPy arrays, pandas Series, plain
//! sequences, optional keyword arguments) into the validated Rust types the
//! core modules expect. Everything here is compiled only with the
//! `python-bindings` feature.
//!
//! Conventions
//! -----------
//! - Conversion failures raise `TypeError`; domain failures raise the
//!   `ValueError` produced by the core error types' `From<_> for PyErr`.
//! - Omitted keyword arguments fall back to the same defaults the Rust API
//!   documents.

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    sampler::{Hmc, HmcOptions},
};

/// Borrow a contiguous 1-D `float64` view of a NumPy array, pandas Series
/// or sequence of floats, copying only when the input is not already one.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy non-negative integer observations out of an `int64` array, a
/// pandas Series or a sequence of ints.
#[cfg(feature = "python-bindings")]
pub fn extract_u64_values(raw_data: &Bound<'_, PyAny>) -> PyResult<Vec<u64>> {
    let type_err =
        || PyTypeError::new_err("expected a 1-D sequence of non-negative integers (int64)");

    let signed: Option<Vec<i64>> = raw_data
        .extract::<PyReadonlyArray1<i64>>()
        .ok()
        .or_else(|| {
            raw_data
                .call_method("to_numpy", (false,), None)
                .ok()
                .and_then(|obj| obj.extract::<PyReadonlyArray1<i64>>().ok())
        })
        .map(|arr| arr.as_array().to_vec());

    match signed {
        Some(values) => {
            values.into_iter().map(|v| u64::try_from(v).map_err(|_| type_err())).collect()
        }
        None => raw_data.extract::<Vec<u64>>().map_err(|_| type_err()),
    }
}

/// Optimizer options from keyword arguments; unset values keep the
/// [`MLEOptions`] defaults.
#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    let defaults = Tolerances::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter.or(defaults.max_iter))?
    };
    let ls = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::MoreThuente,
    };
    Ok(MLEOptions::new(tols, ls, false, lbfgs_mem)?)
}

/// Sampler with the requested chain layout; `None` when every argument is
/// unset, meaning the compiled default program should be used.
#[cfg(feature = "python-bindings")]
pub fn extract_hmc(
    chains: Option<usize>, warmup: Option<usize>, draws: Option<usize>,
) -> PyResult<Option<Hmc>> {
    if chains.is_none() && warmup.is_none() && draws.is_none() {
        return Ok(None);
    }
    let d = HmcOptions::default();
    let opts = HmcOptions::new(
        chains.unwrap_or(d.chains),
        warmup.unwrap_or(d.warmup),
        draws.unwrap_or(d.draws),
    )?;
    Ok(Some(Hmc::new(opts)?))
}
