//! Module `engines::tree::binomial`.
//!
//! Cox-Ross-Rubinstein lattice: `u = exp(sigma sqrt(dt))`, `d = 1/u`,
//! `p = (exp((r - q) dt) - d) / (u - d)`, valued by backward induction over a
//! single `n + 1` buffer owned by the call.
//!
//! References: Hull (11th ed.) Ch. 13, Cox-Ross-Rubinstein (1979), and backward-induction recursions around Eq. (13.10).
//!
//! Numerical considerations: convergence to Black-Scholes is first order in `1/n` with an
//! even/odd oscillation for at-the-money strikes. The lattice is only arbitrage-free when
//! `sigma >= |r - q| sqrt(dt)`; below that `p` leaves `[0, 1]` and pricing fails with
//! [`Degeneracy::ProbabilityOutOfRange`] instead of returning a wrong number. Node prices
//! span `S exp(+-sigma sqrt(T n))`, which leaves the range of `f64` for long-dated, high-vol
//! or finely stepped lattices; the induction never forms those prices directly, and a root
//! value that still overflows is [`Degeneracy::NonFinitePrice`].
use serde::Serialize;

use crate::core::{Degeneracy, ExerciseStyle, OptionParams, OptionPricer, OptionType, Result};
use crate::validation::validate_option_params;

/// Per-call lattice constants derived from [`OptionParams`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatticeParams {
    /// Time increment `T / n`.
    pub dt: f64,
    /// One-step discount factor `exp(-r dt)`.
    pub discount: f64,
    /// Up factor `u`.
    pub up: f64,
    /// Down factor `d = 1/u`.
    pub down: f64,
    /// Risk-neutral up probability `p`.
    pub probability: f64,
}

impl LatticeParams {
    /// Derives lattice constants and enforces the no-arbitrage bounds.
    ///
    /// Inputs are assumed to have passed [`validate_option_params`].
    ///
    /// # Errors
    /// - [`Degeneracy::FlatLattice`] when `u == d` (zero volatility, or a
    ///   volatility so small that `sigma sqrt(dt)` vanishes in `exp`).
    /// - [`Degeneracy::NonFiniteFactor`] when `u` overflows.
    /// - [`Degeneracy::ProbabilityOutOfRange`] when `p` is outside `[0, 1]`.
    pub fn new(params: &OptionParams) -> Result<Self> {
        let dt = params.expiry / params.steps as f64;
        let up = (params.vol * dt.sqrt()).exp();
        let down = 1.0 / up;
        if !up.is_finite() {
            return Err(Degeneracy::NonFiniteFactor { factor: up }.into());
        }
        if up == down {
            return Err(Degeneracy::FlatLattice { factor: up }.into());
        }

        let growth = ((params.rate - params.dividend_yield) * dt).exp();
        let probability = (growth - down) / (up - down);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(Degeneracy::ProbabilityOutOfRange { probability }.into());
        }

        Ok(Self {
            dt,
            discount: (-params.rate * dt).exp(),
            up,
            down,
            probability,
        })
    }
}

/// Price plus the lattice it was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatticeValuation {
    /// Present value at the root node.
    pub price: f64,
    /// Number of lattice steps.
    pub steps: usize,
    /// Derived lattice constants.
    pub lattice: LatticeParams,
}

/// Cox-Ross-Rubinstein binomial tree engine for European and American vanillas.
///
/// Stateless: every call allocates its own value buffer, so one engine can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinomialTreeEngine;

impl BinomialTreeEngine {
    /// Creates a tree engine.
    pub fn new() -> Self {
        Self
    }

    /// Validates, builds the lattice and runs backward induction.
    ///
    /// # Errors
    /// [`crate::core::PricingError::InvalidParameter`] for invalid inputs and
    /// [`crate::core::PricingError::DegenerateModel`] for arbitrage-inconsistent lattices
    /// and for a root value that overflows.
    pub fn valuate(&self, params: &OptionParams) -> Result<LatticeValuation> {
        validate_option_params(params)?;
        let lattice = LatticeParams::new(params)?;

        let mut values = vec![0.0_f64; params.steps + 1];
        let price = roll_back(&mut values, params, &lattice);
        if !price.is_finite() {
            return Err(Degeneracy::NonFinitePrice { price }.into());
        }

        Ok(LatticeValuation {
            price,
            steps: params.steps,
            lattice,
        })
    }
}

impl OptionPricer for BinomialTreeEngine {
    fn price(&self, params: &OptionParams) -> Result<f64> {
        self.valuate(params).map(|v| v.price)
    }
}

/// Backward induction over `values` (length `steps + 1`), returning the root value.
///
/// Node `j` at step `i` has underlying `S exp((2j - i) sigma sqrt(dt))`. Puts roll back in
/// cash. Calls roll back in units of the node's own spot (`V / S_ij`, at most one), with
/// the `u` and `d` factors folded into the transition weights. Exercise values come from a
/// table indexed by `2j - i` built in log space, so the extreme nodes of a wide lattice
/// saturate inside the exercise term instead of poisoning the induction.
///
/// Within a step, nodes are overwritten in increasing `j`, so `values[j + 1]` still holds
/// the step-`i + 1` value when node `j` reads it.
fn roll_back(values: &mut [f64], params: &OptionParams, lattice: &LatticeParams) -> f64 {
    let steps = params.steps;
    debug_assert!(values.len() > steps);

    let log_step = params.vol * lattice.dt.sqrt();
    let p = lattice.probability;
    // Exercise value at offset k is `level - exp(log_scale + sign * k * log_step)`.
    let (level, log_scale, sign, weight_up, weight_down, numeraire) = match params.option_type {
        OptionType::Put => (
            params.strike,
            params.spot.ln(),
            1.0,
            lattice.discount * p,
            lattice.discount * (1.0 - p),
            1.0,
        ),
        OptionType::Call => (
            1.0,
            params.strike.ln() - params.spot.ln(),
            -1.0,
            lattice.discount * p * lattice.up,
            lattice.discount * (1.0 - p) * lattice.down,
            params.spot,
        ),
    };
    // exercise[m] holds offset k = m - steps.
    let exercise: Vec<f64> = (0..=2 * steps)
        .map(|m| level - (log_scale + sign * (m as f64 - steps as f64) * log_step).exp())
        .collect();

    for (j, value) in values.iter_mut().take(steps + 1).enumerate() {
        *value = exercise[2 * j].max(0.0);
    }

    let american = params.exercise.is_american();
    for i in (0..steps).rev() {
        if american {
            let row = &exercise[steps - i..];
            for j in 0..=i {
                let continuation = weight_up * values[j + 1] + weight_down * values[j];
                values[j] = continuation.max(row[2 * j]);
            }
        } else {
            for j in 0..=i {
                values[j] = weight_up * values[j + 1] + weight_down * values[j];
            }
        }
    }

    numeraire * values[0]
}

/// Prices one parameter set on the CRR lattice.
///
/// # Examples
/// ```
/// use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
/// use openlattice::engines::tree::binomial_price;
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
/// let px = binomial_price(&params).unwrap();
/// assert!((px - 10.4306).abs() < 1e-3);
/// ```
pub fn binomial_price(params: &OptionParams) -> Result<f64> {
    BinomialTreeEngine.price(params)
}

/// Flat-argument form of [`binomial_price`].
#[allow(clippy::too_many_arguments)]
pub fn crr_price(
    option_type: OptionType,
    exercise: ExerciseStyle,
    s: f64,
    k: f64,
    r: f64,
    q: f64,
    sigma: f64,
    t: f64,
    steps: usize,
) -> Result<f64> {
    binomial_price(&OptionParams {
        option_type,
        exercise,
        spot: s,
        strike: k,
        expiry: t,
        rate: r,
        vol: sigma,
        dividend_yield: q,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricingError;
    use crate::engines::analytic::black_scholes_merton_price;
    use approx::assert_relative_eq;

    fn params(option_type: OptionType, exercise: ExerciseStyle) -> OptionParams {
        OptionParams {
            option_type,
            exercise,
            spot: 100.0,
            strike: 100.0,
            expiry: 1.0,
            rate: 0.05,
            vol: 0.2,
            dividend_yield: 0.02,
            steps: 100,
        }
    }

    /// Textbook recursion with explicit powers at every node.
    fn reference_price(p: &OptionParams) -> f64 {
        let n = p.steps;
        let dt = p.expiry / n as f64;
        let disc = (-p.rate * dt).exp();
        let u = (p.vol * dt.sqrt()).exp();
        let d = 1.0 / u;
        let prob = (((p.rate - p.dividend_yield) * dt).exp() - d) / (u - d);
        let node = |i: usize, j: usize| p.spot * u.powi(j as i32) * d.powi((i - j) as i32);

        let mut v: Vec<f64> = (0..=n).map(|j| p.option_type.payoff(node(n, j), p.strike)).collect();
        for i in (0..n).rev() {
            for j in 0..=i {
                v[j] = disc * (prob * v[j + 1] + (1.0 - prob) * v[j]);
                if p.exercise.is_american() {
                    v[j] = v[j].max(p.option_type.exercise_value(node(i, j), p.strike));
                }
            }
        }
        v[0]
    }

    #[test]
    fn european_call_with_dividend_matches_known_value() {
        let px = binomial_price(&params(OptionType::Call, ExerciseStyle::European)).unwrap();
        assert_relative_eq!(px, 9.207_590, epsilon = 1e-5);
    }

    #[test]
    fn no_dividend_demo_values() {
        let call = OptionParams {
            dividend_yield: 0.0,
            ..params(OptionType::Call, ExerciseStyle::European)
        };
        let put = OptionParams {
            option_type: OptionType::Put,
            exercise: ExerciseStyle::American,
            ..call
        };
        assert_relative_eq!(binomial_price(&call).unwrap(), 10.430_612, epsilon = 1e-5);
        assert_relative_eq!(binomial_price(&put).unwrap(), 6.082_354, epsilon = 1e-5);
    }

    #[test]
    fn matches_explicit_power_recursion_for_all_styles() {
        for option_type in [OptionType::Call, OptionType::Put] {
            for exercise in [ExerciseStyle::European, ExerciseStyle::American] {
                for strike in [80.0, 100.0, 125.0] {
                    let p = OptionParams {
                        strike,
                        ..params(option_type, exercise)
                    };
                    let px = binomial_price(&p).unwrap();
                    assert_relative_eq!(px, reference_price(&p), epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn american_put_exceeds_european_put() {
        let eu = binomial_price(&params(OptionType::Put, ExerciseStyle::European)).unwrap();
        let am = binomial_price(&params(OptionType::Put, ExerciseStyle::American)).unwrap();
        assert_relative_eq!(am, 6.651_030, epsilon = 1e-5);
        assert!(am > eu, "american={am} european={eu}");
    }

    #[test]
    fn american_call_without_dividend_equals_european() {
        let eu = OptionParams {
            dividend_yield: 0.0,
            ..params(OptionType::Call, ExerciseStyle::European)
        };
        let am = OptionParams {
            exercise: ExerciseStyle::American,
            ..eu
        };
        assert_relative_eq!(
            binomial_price(&am).unwrap(),
            binomial_price(&eu).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn converges_towards_black_scholes() {
        let p = params(OptionType::Call, ExerciseStyle::European);
        let bs = black_scholes_merton_price(OptionType::Call, 100.0, 100.0, 0.05, 0.02, 0.2, 1.0);
        let coarse = (binomial_price(&p.with_steps(50)).unwrap() - bs).abs();
        let fine = (binomial_price(&p.with_steps(1000)).unwrap() - bs).abs();
        assert!(fine < coarse);
        assert!(fine < 5e-3, "err={fine}");
    }

    #[test]
    fn single_step_lattice_is_one_period_model() {
        let p = OptionParams {
            steps: 1,
            dividend_yield: 0.0,
            ..params(OptionType::Call, ExerciseStyle::European)
        };
        let lattice = LatticeParams::new(&p).unwrap();
        let expected = lattice.discount * lattice.probability * (100.0 * lattice.up - 100.0);
        assert_relative_eq!(binomial_price(&p).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn zero_vol_is_rejected_as_flat_lattice() {
        let p = params(OptionType::Call, ExerciseStyle::European).with_vol(0.0);
        assert_eq!(
            binomial_price(&p),
            Err(PricingError::DegenerateModel(Degeneracy::FlatLattice {
                factor: 1.0
            }))
        );
    }

    #[test]
    fn arbitrage_violation_reports_probability() {
        // exp(r dt) exceeds u: p > 1.
        let high_rate = OptionParams {
            rate: 0.5,
            vol: 0.01,
            dividend_yield: 0.0,
            steps: 10,
            ..params(OptionType::Call, ExerciseStyle::European)
        };
        match binomial_price(&high_rate) {
            Err(PricingError::DegenerateModel(Degeneracy::ProbabilityOutOfRange {
                probability,
            })) => assert!(probability > 1.0),
            other => panic!("unexpected {other:?}"),
        }

        // Large dividend yield pushes growth below d: p < 0.
        let high_div = OptionParams {
            dividend_yield: 0.6,
            ..high_rate
        };
        match binomial_price(&high_div) {
            Err(PricingError::DegenerateModel(Degeneracy::ProbabilityOutOfRange {
                probability,
            })) => assert!(probability < 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_inputs_fail_before_lattice_construction() {
        let p = OptionParams {
            strike: 0.0,
            ..params(OptionType::Put, ExerciseStyle::American)
        };
        assert!(matches!(
            binomial_price(&p),
            Err(PricingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn valuation_exposes_lattice_constants() {
        let valuation = BinomialTreeEngine::new()
            .valuate(&params(OptionType::Call, ExerciseStyle::European))
            .unwrap();
        assert_eq!(valuation.steps, 100);
        assert_relative_eq!(valuation.lattice.dt, 0.01, epsilon = 1e-15);
        assert_relative_eq!(valuation.lattice.up * valuation.lattice.down, 1.0, epsilon = 1e-15);
        assert!(valuation.lattice.probability > 0.0 && valuation.lattice.probability < 1.0);
    }

    #[test]
    fn flat_argument_form_matches_struct_form() {
        let p = params(OptionType::Put, ExerciseStyle::American);
        let flat = crr_price(
            OptionType::Put,
            ExerciseStyle::American,
            100.0,
            100.0,
            0.05,
            0.02,
            0.2,
            1.0,
            100,
        )
        .unwrap();
        assert_eq!(flat, binomial_price(&p).unwrap());
    }

    #[test]
    fn wide_lattice_stays_finite_and_accurate() {
        // sigma sqrt(T n) runs from about 707 to 866: u^n and d^n leave the f64 range.
        let base = OptionParams {
            expiry: 10.0,
            vol: 5.0,
            dividend_yield: 0.0,
            ..params(OptionType::Call, ExerciseStyle::European)
        };
        let bs_call = black_scholes_merton_price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 5.0, 10.0);
        let bs_put = black_scholes_merton_price(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 5.0, 10.0);
        for steps in [2000, 2300, 3000] {
            let call = binomial_price(&base.with_steps(steps)).unwrap();
            assert!((call - bs_call).abs() < 1e-3, "n={steps} call={call} bs={bs_call}");

            let put = binomial_price(&OptionParams {
                option_type: OptionType::Put,
                ..base.with_steps(steps)
            })
            .unwrap();
            assert!((put - bs_put).abs() < 1e-3, "n={steps} put={put} bs={bs_put}");
        }

        let american_call = binomial_price(&OptionParams {
            exercise: ExerciseStyle::American,
            dividend_yield: 0.02,
            steps: 3000,
            ..base
        })
        .unwrap();
        assert!(american_call.is_finite());
        assert!(american_call > 0.0 && american_call <= 100.0);
    }

    #[test]
    fn overflowing_root_value_is_degenerate() {
        // One step: exp(-r dt) = e^700 times a strike of 1e10 exceeds f64::MAX.
        let p = OptionParams {
            option_type: OptionType::Put,
            exercise: ExerciseStyle::European,
            spot: 100.0,
            strike: 1e10,
            expiry: 1.0,
            rate: -700.0,
            vol: 705.0,
            dividend_yield: 0.0,
            steps: 1,
        };
        assert!(LatticeParams::new(&p).is_ok());
        match binomial_price(&p) {
            Err(PricingError::DegenerateModel(Degeneracy::NonFinitePrice { price })) => {
                assert!(price.is_infinite());
            }
            other => panic!("expected NonFinitePrice, got {other:?}"),
        }
    }
}
