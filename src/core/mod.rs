//! Core traits, common domain types, and library-wide result/error structures.

pub mod error;
pub mod params;
pub mod types;

pub use error::{Degeneracy, PricingError, Result};
pub use params::{OptionParams, OptionParamsBuilder};
pub use types::{ExerciseStyle, OptionType};

/// Pricing primitive every orchestrator composes over.
///
/// Implemented by [`crate::engines::tree::BinomialTreeEngine`] and by any closure
/// `Fn(&OptionParams) -> Result<f64>`, so convergence, implied-vol and Greeks
/// routines can be driven by an alternative pricer.
pub trait OptionPricer {
    /// Prices one parameter set.
    fn price(&self, params: &OptionParams) -> Result<f64>;
}

impl<F> OptionPricer for F
where
    F: Fn(&OptionParams) -> Result<f64>,
{
    fn price(&self, params: &OptionParams) -> Result<f64> {
        self(params)
    }
}
