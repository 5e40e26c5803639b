//! zeta::validation — domain checks shared by the zeta entry points.

use crate::zeta::errors::{ZetaError, ZetaResult};

/// Require a finite, strictly positive shape parameter.
pub fn validate_alpha(alpha: f64) -> ZetaResult<()> {
    if !alpha.is_finite() {
        return Err(ZetaError::InvalidAlpha { value: alpha, reason: "Alpha must be finite." });
    }
    if alpha <= 0.0 {
        return Err(ZetaError::InvalidAlpha { value: alpha, reason: "Alpha must be positive." });
    }
    Ok(())
}

/// Require a finite, strictly positive offset. Offsets are never clamped.
pub fn validate_offset(q: f64) -> ZetaResult<()> {
    if !q.is_finite() {
        return Err(ZetaError::InvalidOffset { value: q, reason: "Offset q must be finite." });
    }
    if q <= 0.0 {
        return Err(ZetaError::InvalidOffset { value: q, reason: "Offset q must be positive." });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Boundary values of both domain checks.
    //
    // Given
    // -----
    // - alpha in {0, -1, NaN, inf, 1e-300} and q in {0, -1, NaN, 1e-300}.
    //
    // Expect
    // ------
    // - Only the strictly positive finite values pass.
    fn domain_checks_accept_only_positive_finite_values() {
        // Act / Assert
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(validate_alpha(bad), Err(ZetaError::InvalidAlpha { .. })));
        }
        for bad in [0.0, -1.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(validate_offset(bad), Err(ZetaError::InvalidOffset { .. })));
        }
        assert!(validate_alpha(1e-300).is_ok());
        assert!(validate_offset(1e-300).is_ok());
    }
}
