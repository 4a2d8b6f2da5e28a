//! Parameter validation run at the top of every public entry point.
//!
//! Checks are structural only: a parameter set that passes here can still be
//! rejected by the pricer as a degenerate lattice (see
//! [`crate::core::Degeneracy`]).

use crate::core::{OptionParams, PricingError, Result};

#[inline]
fn finite(value: f64, field: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::invalid(format!(
            "{field} must be finite, got {value}"
        )))
    }
}

#[inline]
pub(crate) fn positive(value: f64, field: &str) -> Result<f64> {
    if finite(value, field)? > 0.0 {
        Ok(value)
    } else {
        Err(PricingError::invalid(format!(
            "{field} must be > 0, got {value}"
        )))
    }
}

#[inline]
pub(crate) fn non_negative(value: f64, field: &str) -> Result<f64> {
    if finite(value, field)? >= 0.0 {
        Ok(value)
    } else {
        Err(PricingError::invalid(format!(
            "{field} must be >= 0, got {value}"
        )))
    }
}

/// Validates a contract/model parameter set.
///
/// # Errors
/// Returns [`PricingError::InvalidParameter`] when:
/// - `spot`, `strike` or `expiry` is not a positive finite number
/// - `steps == 0`
/// - `vol` or `dividend_yield` is negative or not finite
/// - `rate` is not finite (any sign is accepted)
///
/// Option and exercise types are enums, so the only way to pass an unknown
/// name is through `FromStr`, which already rejects it.
pub fn validate_option_params(params: &OptionParams) -> Result<()> {
    positive(params.spot, "spot")?;
    positive(params.strike, "strike")?;
    positive(params.expiry, "expiry")?;
    finite(params.rate, "rate")?;
    non_negative(params.vol, "vol")?;
    non_negative(params.dividend_yield, "dividend yield")?;
    if params.steps == 0 {
        return Err(PricingError::invalid("steps must be > 0"));
    }
    Ok(())
}

/// Converts a step count supplied as a float (e.g. parsed from a loosely typed
/// request) into a lattice size.
///
/// # Errors
/// Returns [`PricingError::InvalidParameter`] for non-finite, non-positive or
/// non-integral values, and for values beyond `u32::MAX`.
///
/// # Examples
/// ```
/// use openlattice::validation::checked_steps;
///
/// assert_eq!(checked_steps(250.0).unwrap(), 250);
/// assert!(checked_steps(12.5).is_err());
/// assert!(checked_steps(0.0).is_err());
/// ```
pub fn checked_steps(value: f64) -> Result<usize> {
    positive(value, "steps")?;
    if value.fract() != 0.0 {
        return Err(PricingError::invalid(format!(
            "steps must be an integer, got {value}"
        )));
    }
    if value > f64::from(u32::MAX) {
        return Err(PricingError::invalid(format!(
            "steps must be <= {}, got {value}",
            u32::MAX
        )));
    }
    Ok(value as usize)
}
