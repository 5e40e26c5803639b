//! loglik_optimizer::types — shared aliases for the L-BFGS stack.
//!
//! Parameters, gradients and Hessians are `ndarray` containers so they plug
//! directly into argmin (`argmin-math` ndarray backend) and `finitediff`.
//! The power-law fit is one-dimensional, but the optimizer stays generic in
//! the parameter length.

use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector.
pub type Theta = Array1<f64>;

/// Gradient of the log-likelihood with respect to [`Theta`].
pub type Grad = Array1<f64>;

pub type Hessian = Array2<f64>;

/// Internal cost `c(θ) = -ℓ(θ)` minimized by argmin.
pub type Cost = f64;

/// Evaluation counters reported by argmin (`"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Largest trial step of the Hager–Zhang search, in units of the L-BFGS
/// direction. argmin's default bracket end (1e5) overflows any objective
/// with exponential growth on the first iteration.
pub const HZ_MAX_STEP: f64 = 1.0;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
