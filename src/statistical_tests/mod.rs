//! statistical_tests — goodness-of-fit diagnostics for integer samples.
//!
//! Purpose
//! -------
//! Check generated datasets against the analytic law they came from. This
//! subtree implements a Pearson χ² test with tail pooling, together with
//! shared input validation and its own error type, including a Python
//! bridge for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - [`GofOutcome::chi_squared`] tests any sample of integers `>= y_min`
//!   against a pmf closure.
//! - [`goodness_of_fit`] is the power-law entry point: a
//!   [`SyntheticDataset`](crate::power_law::SyntheticDataset) against a
//!   [`DiscretePowerLaw`](crate::power_law::DiscretePowerLaw).
//! - [`validate_input`] centralizes the sample and threshold guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - Test routines report failures through [`GofResult`] and never panic
//!   on user-facing invalid inputs.
//! - [`GofError`] values are small and cloneable; at the Python boundary
//!   they become `ValueError`.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_zipf::power_law::DiscretePowerLaw;
//! use rust_zipf::statistical_tests::goodness_of_fit;
//!
//! let law = DiscretePowerLaw::new(2.5, 1)?;
//! let data = law.sample(2_000, 7)?;
//! let outcome = goodness_of_fit(&data, &law)?;
//! assert!((0.0..=1.0).contains(&outcome.p_value()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod errors;
pub mod goodness_of_fit;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{GofError, GofResult};
pub use self::goodness_of_fit::{DEFAULT_MIN_EXPECTED, GofOutcome, goodness_of_fit};
pub use self::validation::validate_input;

pub mod prelude {
    pub use super::errors::{GofError, GofResult};
    pub use super::goodness_of_fit::{GofOutcome, goodness_of_fit};
}
