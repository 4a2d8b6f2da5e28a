//! Black-Scholes-Merton closed form for European vanillas with continuous dividend yield.
//!
//! This is the `n -> infinity` limit of the European lattice price and serves as the
//! reference when measuring discretisation error.

use crate::core::OptionType;
use crate::math::normal_cdf;

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 =
        ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes-Merton price.
///
/// Edge cases:
/// - `expiry <= 0` returns intrinsic value.
/// - `vol <= 0` returns the discounted forward intrinsic value.
///
/// # Examples
/// ```rust
/// use openlattice::core::OptionType;
/// use openlattice::engines::analytic::black_scholes_merton_price;
///
/// let call = black_scholes_merton_price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
/// assert!((call - 10.4506).abs() < 1e-4);
/// ```
pub fn black_scholes_merton_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 {
        return option_type.payoff(spot, strike);
    }
    let df_r = (-rate * expiry).exp();
    let df_q = (-dividend_yield * expiry).exp();
    if vol <= 0.0 {
        return option_type.payoff(spot * df_q, strike * df_r);
    }

    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    match option_type {
        OptionType::Call => spot * df_q * normal_cdf(d1) - strike * df_r * normal_cdf(d2),
        OptionType::Put => strike * df_r * normal_cdf(-d2) - spot * df_q * normal_cdf(-d1),
    }
}
