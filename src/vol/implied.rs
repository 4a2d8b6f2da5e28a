//! Lattice implied-volatility inversion by bisection.
//!
//! The solver assumes the lattice price is non-decreasing in volatility over the bracket
//! (true for vanillas) and keeps `price(low) <= target <= price(high)` throughout. Hitting
//! `max_iter` returns the midpoint of the final bracket rather than failing.
//!
//! The CRR lattice is only arbitrage-free for `sigma >= |r - q| sqrt(T / n)`, so the lower
//! bound is lifted to that floor before bracketing; a `vol_low` below it would otherwise
//! always fail with a degenerate-model error.

use serde::{Deserialize, Serialize};

use crate::core::{OptionParams, OptionPricer, PricingError, Result};
use crate::engines::tree::BinomialTreeEngine;
use crate::validation::{non_negative, positive, validate_option_params};

/// Relative margin above the arbitrage floor so `p` stays inside `[0, 1]` after rounding.
const FLOOR_MARGIN: f64 = 1e-9;

/// Bracket and stopping controls for [`implied_volatility`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedVolConfig {
    /// Lower volatility bound.
    pub vol_low: f64,
    /// Upper volatility bound.
    pub vol_high: f64,
    /// Absolute price tolerance.
    pub tol: f64,
    /// Bisection iteration cap.
    pub max_iter: usize,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            vol_low: 1e-6,
            vol_high: 5.0,
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl ImpliedVolConfig {
    /// # Errors
    /// [`PricingError::InvalidParameter`] unless `0 < vol_low < vol_high` (finite),
    /// `tol >= 0` (finite) and `max_iter > 0`.
    pub fn validate(&self) -> Result<()> {
        positive(self.vol_low, "vol_low")?;
        positive(self.vol_high, "vol_high")?;
        if self.vol_low >= self.vol_high {
            return Err(PricingError::invalid(format!(
                "vol_low ({}) must be below vol_high ({})",
                self.vol_low, self.vol_high
            )));
        }
        non_negative(self.tol, "tol")?;
        if self.max_iter == 0 {
            return Err(PricingError::invalid("max_iter must be > 0"));
        }
        Ok(())
    }
}

/// Solver output with convergence status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolSolution {
    /// Implied volatility.
    pub vol: f64,
    /// Bisection iterations performed (0 when a bracket end already matched).
    pub iterations: usize,
    /// False when `max_iter` was exhausted and `vol` is the final midpoint.
    pub converged: bool,
}

/// Smallest volatility for which the lattice probability stays inside `[0, 1]`.
///
/// # Examples
/// ```
/// use openlattice::core::OptionParams;
/// use openlattice::vol::arbitrage_free_vol_floor;
///
/// let params = OptionParams::builder()
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .dividend_yield(0.02)
///     .vol(0.2)
///     .steps(100)
///     .build()
///     .unwrap();
/// assert!((arbitrage_free_vol_floor(&params) - 0.003).abs() < 1e-12);
/// ```
pub fn arbitrage_free_vol_floor(params: &OptionParams) -> f64 {
    (params.rate - params.dividend_yield).abs() * (params.expiry / params.steps as f64).sqrt()
}

/// Implied volatility of `market_price` on the CRR lattice.
///
/// `params.vol` is ignored.
///
/// # Errors
/// - [`PricingError::InvalidParameter`] for `market_price <= 0`, invalid contract
///   parameters or invalid solver controls.
/// - [`PricingError::NotBracketed`] when the bracket prices do not contain `market_price`.
/// - Pricer errors are propagated unchanged.
///
/// # Examples
/// ```
/// use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
/// use openlattice::engines::tree::binomial_price;
/// use openlattice::vol::{ImpliedVolConfig, implied_volatility};
///
/// let params = OptionParams::builder()
///     .option_type(OptionType::Put)
///     .exercise(ExerciseStyle::American)
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .vol(0.3)
///     .steps(100)
///     .build()
///     .unwrap();
/// let market = binomial_price(&params).unwrap();
/// let iv = implied_volatility(market, &params, &ImpliedVolConfig::default()).unwrap();
/// assert!((iv - 0.3).abs() < 1e-6);
/// ```
pub fn implied_volatility(
    market_price: f64,
    params: &OptionParams,
    config: &ImpliedVolConfig,
) -> Result<f64> {
    implied_volatility_report(market_price, params, config).map(|s| s.vol)
}

/// [`implied_volatility`] with iteration count and convergence flag.
pub fn implied_volatility_report(
    market_price: f64,
    params: &OptionParams,
    config: &ImpliedVolConfig,
) -> Result<ImpliedVolSolution> {
    implied_volatility_with(&BinomialTreeEngine, market_price, params, config)
}

/// Bisection over an arbitrary pricer.
pub fn implied_volatility_with<P>(
    pricer: &P,
    market_price: f64,
    params: &OptionParams,
    config: &ImpliedVolConfig,
) -> Result<ImpliedVolSolution>
where
    P: OptionPricer + ?Sized,
{
    config.validate()?;
    positive(market_price, "market price")?;
    validate_option_params(&params.with_vol(config.vol_low))?;

    let floor = arbitrage_free_vol_floor(params) * (1.0 + FLOOR_MARGIN);
    let mut low = config.vol_low;
    let mut high = config.vol_high;
    if floor > low {
        tracing::debug!(vol_low = low, floor, "lifting vol_low to lattice arbitrage floor");
        low = floor;
    }

    let high_price = pricer.price(&params.with_vol(high))?;
    if low >= high {
        return Err(PricingError::NotBracketed {
            target: market_price,
            low_price: high_price,
            high_price,
        });
    }
    let low_price = pricer.price(&params.with_vol(low))?;

    if !(low_price <= market_price && market_price <= high_price) {
        return Err(PricingError::NotBracketed {
            target: market_price,
            low_price,
            high_price,
        });
    }
    if (low_price - market_price).abs() <= config.tol {
        return Ok(ImpliedVolSolution {
            vol: low,
            iterations: 0,
            converged: true,
        });
    }
    if (high_price - market_price).abs() <= config.tol {
        return Ok(ImpliedVolSolution {
            vol: high,
            iterations: 0,
            converged: true,
        });
    }

    for iteration in 1..=config.max_iter {
        let mid = 0.5 * (low + high);
        let price = pricer.price(&params.with_vol(mid))?;
        tracing::trace!(iteration, vol = mid, price, "bisection step");

        if (price - market_price).abs() <= config.tol {
            tracing::debug!(iteration, vol = mid, converged = true, "implied vol solved");
            return Ok(ImpliedVolSolution {
                vol: mid,
                iterations: iteration,
                converged: true,
            });
        }
        if price < market_price {
            low = mid;
        } else {
            high = mid;
        }
    }

    let vol = 0.5 * (low + high);
    tracing::debug!(
        iterations = config.max_iter,
        vol,
        low,
        high,
        converged = false,
        "implied vol iteration cap reached"
    );
    Ok(ImpliedVolSolution {
        vol,
        iterations: config.max_iter,
        converged: false,
    })
}
