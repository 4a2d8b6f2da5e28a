//! Contract and model parameters consumed by every pricing entry point.
//!
//! [`OptionParams`] is a flat `Copy` value: the orchestrators derive bumped copies
//! with the `with_*` helpers instead of mutating a shared parameter object.

use serde::{Deserialize, Serialize};

use crate::core::{ExerciseStyle, OptionType, Result};
use crate::validation::validate_option_params;

/// Full parameter set for one lattice valuation.
///
/// # Examples
/// ```
/// use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
///
/// let params = OptionParams::builder()
///     .option_type(OptionType::Put)
///     .exercise(ExerciseStyle::American)
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .vol(0.2)
///     .steps(100)
///     .build()
///     .unwrap();
/// assert_eq!(params.dividend_yield, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    /// Call or put.
    pub option_type: OptionType,
    /// European or American exercise.
    pub exercise: ExerciseStyle,
    /// Spot price `S`.
    pub spot: f64,
    /// Strike `K`.
    pub strike: f64,
    /// Time to expiry `T` in years.
    pub expiry: f64,
    /// Continuously compounded risk-free rate `r`; any sign.
    pub rate: f64,
    /// Annualised volatility `sigma`.
    pub vol: f64,
    /// Continuous dividend yield `q`.
    #[serde(default)]
    pub dividend_yield: f64,
    /// Lattice step count `n`.
    pub steps: usize,
}

impl OptionParams {
    /// Starts a parameter builder.
    #[inline]
    pub fn builder() -> OptionParamsBuilder {
        OptionParamsBuilder::default()
    }

    /// Checks the parameter set; see [`validate_option_params`].
    pub fn validate(&self) -> Result<()> {
        validate_option_params(self)
    }

    /// Copy with a different volatility.
    #[inline]
    pub fn with_vol(self, vol: f64) -> Self {
        Self { vol, ..self }
    }

    /// Copy with a different spot.
    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Copy with a different expiry.
    #[inline]
    pub fn with_expiry(self, expiry: f64) -> Self {
        Self { expiry, ..self }
    }

    /// Copy with a different lattice size.
    #[inline]
    pub fn with_steps(self, steps: usize) -> Self {
        Self { steps, ..self }
    }
}

/// Builder for [`OptionParams`].
///
/// Option type and exercise default to a European call; rate and dividend
/// yield default to zero. Spot, strike, expiry, vol and steps are required.
#[derive(Debug, Clone, Default)]
pub struct OptionParamsBuilder {
    option_type: Option<OptionType>,
    exercise: Option<ExerciseStyle>,
    spot: Option<f64>,
    strike: Option<f64>,
    expiry: Option<f64>,
    rate: Option<f64>,
    vol: Option<f64>,
    dividend_yield: Option<f64>,
    steps: Option<usize>,
}

impl OptionParamsBuilder {
    #[inline]
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    #[inline]
    pub fn exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = Some(exercise);
        self
    }

    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    #[inline]
    pub fn expiry(mut self, expiry: f64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    #[inline]
    pub fn vol(mut self, vol: f64) -> Self {
        self.vol = Some(vol);
        self
    }

    /// Sets the continuous dividend yield. Omitting it means `q = 0`.
    #[inline]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    #[inline]
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Validates and builds an [`OptionParams`].
    ///
    /// # Errors
    /// Returns [`crate::core::PricingError::InvalidParameter`] when a required
    /// field is missing or any field fails validation.
    pub fn build(self) -> Result<OptionParams> {
        let params = OptionParams {
            option_type: self.option_type.unwrap_or(OptionType::Call),
            exercise: self.exercise.unwrap_or(ExerciseStyle::European),
            spot: required(self.spot, "spot")?,
            strike: required(self.strike, "strike")?,
            expiry: required(self.expiry, "expiry")?,
            rate: self.rate.unwrap_or(0.0),
            vol: required(self.vol, "vol")?,
            dividend_yield: self.dividend_yield.unwrap_or(0.0),
            steps: required(self.steps, "steps")?,
        };
        params.validate()?;
        Ok(params)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| crate::core::PricingError::invalid(format!("{field} is required")))
}
