//! Finite-difference Greeks on the binomial lattice.
//!
//! Delta and gamma use a central spot bump, theta a central expiry bump. Five pricer
//! calls per estimate, each on an independent copy of the parameters.
//!
//! Theta is returned as `dV/dT` (sensitivity to time-to-expiry), so a long vanilla normally
//! shows a positive theta here. Negate it for the calendar-time decay convention.
//!
//! The lattice price is piecewise linear in spot between terminal-node crossings of the strike,
//! so gamma from a small spot bump is noisy: it is zero inside a linear piece and spikes when
//! a bump straddles a crossing. Bumps of a few lattice spacings smooth this out.

use serde::{Deserialize, Serialize};

use crate::core::{OptionParams, OptionPricer, Result};
use crate::engines::tree::BinomialTreeEngine;
use crate::validation::{positive, validate_option_params};

/// Floor applied to the down-bumped expiry.
const MIN_EXPIRY: f64 = 1e-8;

/// Bump sizes for [`greeks`]. `None` selects the default for that bump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreekBumps {
    /// Spot bump; defaults to `max(0.01 S, 1e-4)`.
    pub spot: Option<f64>,
    /// Expiry bump; defaults to `max(1e-4, 1e-3 T)`.
    pub time: Option<f64>,
}

impl GreekBumps {
    /// # Errors
    /// [`crate::core::PricingError::InvalidParameter`] for a supplied bump that is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<()> {
        if let Some(ds) = self.spot {
            positive(ds, "spot bump")?;
        }
        if let Some(dt) = self.time {
            positive(dt, "time bump")?;
        }
        Ok(())
    }

    /// Spot bump applied at `spot`.
    pub fn spot_bump(&self, spot: f64) -> f64 {
        self.spot.unwrap_or_else(|| (0.01 * spot).max(1e-4))
    }

    /// Expiry bump applied at `expiry`.
    pub fn time_bump(&self, expiry: f64) -> f64 {
        self.time.unwrap_or_else(|| (1e-3 * expiry).max(1e-4))
    }
}

/// Lattice price with its bump-and-reprice sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeGreeks {
    /// Base lattice price.
    pub price: f64,
    /// `dV/dS`.
    pub delta: f64,
    /// `d2V/dS2`.
    pub gamma: f64,
    /// `dV/dT`; not negated.
    pub theta: f64,
}

/// Estimates price, delta, gamma and theta on the CRR lattice.
///
/// # Errors
/// [`crate::core::PricingError::InvalidParameter`] for invalid parameters or bumps; a
/// spot bump of at least the spot also fails because the down-bumped spot is not positive.
/// Pricer errors on any of the five calls are propagated.
///
/// # Examples
/// ```
/// use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
/// use openlattice::greeks::{GreekBumps, greeks};
///
/// let params = OptionParams::builder()
///     .option_type(OptionType::Call)
///     .exercise(ExerciseStyle::European)
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .vol(0.2)
///     .steps(100)
///     .build()
///     .unwrap();
/// let g = greeks(&params, &GreekBumps::default()).unwrap();
/// assert!(g.delta > 0.0 && g.delta < 1.0);
/// assert!(g.theta > 0.0);
/// ```
pub fn greeks(params: &OptionParams, bumps: &GreekBumps) -> Result<LatticeGreeks> {
    greeks_with(&BinomialTreeEngine, params, bumps)
}

/// [`greeks`] over an arbitrary pricer.
pub fn greeks_with<P>(pricer: &P, params: &OptionParams, bumps: &GreekBumps) -> Result<LatticeGreeks>
where
    P: OptionPricer + ?Sized,
{
    validate_option_params(params)?;
    bumps.validate()?;

    let ds = bumps.spot_bump(params.spot);
    let dt = bumps.time_bump(params.expiry);

    let base = pricer.price(params)?;
    let spot_up = pricer.price(&params.with_spot(params.spot + ds))?;
    let spot_down = pricer.price(&params.with_spot(params.spot - ds))?;
    let time_up = pricer.price(&params.with_expiry(params.expiry + dt))?;
    let time_down = pricer.price(&params.with_expiry((params.expiry - dt).max(MIN_EXPIRY)))?;

    let delta = (spot_up - spot_down) / (2.0 * ds);
    let gamma = (spot_up - 2.0 * base + spot_down) / (ds * ds);
    let theta = (time_up - time_down) / (2.0 * dt);
    tracing::trace!(ds, dt, base, delta, gamma, theta, "lattice greeks");

    Ok(LatticeGreeks {
        price: base,
        delta,
        gamma,
        theta,
    })
}
