use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Signed exercise value `spot - strike` (calls) or `strike - spot` (puts).
    ///
    /// Not floored at zero; callers that need a payoff use [`OptionType::payoff`].
    #[inline(always)]
    pub fn exercise_value(self, spot: f64, strike: f64) -> f64 {
        self.sign() * (spot - strike)
    }

    /// Terminal payoff `max(exercise_value, 0)`.
    #[inline(always)]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        self.exercise_value(spot, strike).max(0.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => f.write_str("call"),
            Self::Put => f.write_str("put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(PricingError::InvalidParameter(format!(
                "option type must be 'call' or 'put', got '{other}'"
            ))),
        }
    }
}

/// Exercise rights for an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    European,
    /// Exercise at any lattice node up to expiry.
    American,
}

impl ExerciseStyle {
    /// True when early exercise is checked at interior nodes.
    #[inline]
    pub fn is_american(self) -> bool {
        matches!(self, Self::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::European => f.write_str("european"),
            Self::American => f.write_str("american"),
        }
    }
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(Self::European),
            "american" => Ok(Self::American),
            other => Err(PricingError::InvalidParameter(format!(
                "exercise type must be 'european' or 'american', got '{other}'"
            ))),
        }
    }
}
