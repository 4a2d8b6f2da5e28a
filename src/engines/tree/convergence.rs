//! Step-count convergence driver for lattice prices.
//!
//! Prices at `n_start`, then at `n_start + step`, `n_start + 2 step`, ... and stops once two
//! consecutive prices differ by at most `tol`. Reaching `n_max` first is not an error: the
//! last computed price is returned with `steps == n_max` and `converged == false`.

use serde::{Deserialize, Serialize};

use crate::core::{OptionParams, OptionPricer, PricingError, Result};
use crate::engines::tree::BinomialTreeEngine;
use crate::validation::{non_negative, validate_option_params};

/// Control parameters for [`converge`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// First lattice size priced.
    pub n_start: usize,
    /// Largest lattice size priced.
    pub n_max: usize,
    /// Absolute price tolerance between consecutive lattice sizes.
    pub tol: f64,
    /// Increment added to the lattice size on every iteration.
    pub step: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            n_start: 50,
            n_max: 2000,
            tol: 1e-4,
            step: 50,
        }
    }
}

impl ConvergenceConfig {
    /// # Errors
    /// [`PricingError::InvalidParameter`] unless `n_start`, `n_max` and `step` are
    /// positive, `n_start <= n_max`, and `tol` is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.n_start == 0 {
            return Err(PricingError::invalid("n_start must be > 0"));
        }
        if self.n_max == 0 {
            return Err(PricingError::invalid("n_max must be > 0"));
        }
        if self.step == 0 {
            return Err(PricingError::invalid("step must be > 0"));
        }
        if self.n_start > self.n_max {
            return Err(PricingError::invalid(format!(
                "n_start ({}) must not exceed n_max ({})",
                self.n_start, self.n_max
            )));
        }
        non_negative(self.tol, "tol")?;
        Ok(())
    }
}

/// Outcome of a convergence run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Last computed price.
    pub price: f64,
    /// Lattice size at convergence, or `n_max` when the tolerance was never met.
    pub steps: usize,
    /// Lattice size `price` was actually computed on.
    pub evaluated_steps: usize,
    /// Whether two consecutive prices came within `tol`.
    pub converged: bool,
}

impl ConvergenceReport {
    /// `(price, steps)` pair; `steps == n_max` signals non-convergence.
    pub fn into_tuple(self) -> (f64, usize) {
        (self.price, self.steps)
    }
}

/// Runs the convergence loop on the CRR lattice.
///
/// `params.steps` is ignored; lattice sizes come from `config`.
///
/// # Examples
/// ```
/// use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
/// use openlattice::engines::tree::{ConvergenceConfig, converge};
///
/// let params = OptionParams::builder()
///     .option_type(OptionType::Put)
///     .exercise(ExerciseStyle::American)
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .vol(0.2)
///     .dividend_yield(0.02)
///     .steps(1)
///     .build()
///     .unwrap();
/// let report = converge(&params, &ConvergenceConfig::default()).unwrap();
/// assert!(report.converged);
/// ```
pub fn converge(params: &OptionParams, config: &ConvergenceConfig) -> Result<ConvergenceReport> {
    converge_with(&BinomialTreeEngine, params, config)
}

/// [`converge`] over an arbitrary pricer.
///
/// # Errors
/// Invalid controls or contract parameters fail with
/// [`PricingError::InvalidParameter`]; any pricer error is propagated as-is.
pub fn converge_with<P>(
    pricer: &P,
    params: &OptionParams,
    config: &ConvergenceConfig,
) -> Result<ConvergenceReport>
where
    P: OptionPricer + ?Sized,
{
    config.validate()?;
    validate_option_params(&params.with_steps(config.n_start))?;

    let mut steps = config.n_start;
    let mut prev = pricer.price(&params.with_steps(steps))?;
    tracing::trace!(steps, price = prev, "convergence start");

    while let Some(next) = steps
        .checked_add(config.step)
        .filter(|&n| n <= config.n_max)
    {
        let price = pricer.price(&params.with_steps(next))?;
        let diff = (price - prev).abs();
        tracing::trace!(steps = next, price, diff, "convergence step");

        if diff <= config.tol {
            tracing::debug!(steps = next, price, diff, converged = true, "convergence finished");
            return Ok(ConvergenceReport {
                price,
                steps: next,
                evaluated_steps: next,
                converged: true,
            });
        }
        prev = price;
        steps = next;
    }

    tracing::debug!(
        steps = config.n_max,
        evaluated_steps = steps,
        price = prev,
        converged = false,
        "convergence finished"
    );
    Ok(ConvergenceReport {
        price: prev,
        steps: config.n_max,
        evaluated_steps: steps,
        converged: false,
    })
}
