//! OpenLattice prices European and American vanilla options on a Cox-Ross-Rubinstein
//! binomial lattice and builds convergence control, implied-volatility inversion and
//! finite-difference Greeks on top of that single pricing primitive.
//!
//! Every orchestrator consumes the [`core::OptionPricer`] trait, so the convergence driver,
//! the bisection solver and the Greeks estimator can be pointed at any pricer with the same
//! contract (including a plain closure).
//!
//! References used across modules include:
//! - Cox, Ross and Rubinstein (1979), *Option Pricing: A Simplified Approach*.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13 and 21.
//!
//! Numerical considerations:
//! - Lattice prices converge to Black-Scholes at first order in `1/n` and oscillate between
//!   even and odd step counts for at-the-money strikes.
//! - The lattice is arbitrage-free only for `sigma >= |r - q| sqrt(T / n)`. Below that the
//!   pricer fails with [`core::PricingError::DegenerateModel`] rather than returning a price
//!   built on a probability outside `[0, 1]`.
//! - Non-convergence of the step-count loop or the bisection is reported through result
//!   flags, not errors.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered batch pricing.
//!
//! # Quick Start
//! Price an American put:
//! ```rust
//! use openlattice::core::{ExerciseStyle, OptionParams, OptionType};
//! use openlattice::engines::tree::binomial_price;
//!
//! let params = OptionParams::builder()
//!     .option_type(OptionType::Put)
//!     .exercise(ExerciseStyle::American)
//!     .spot(100.0)
//!     .strike(100.0)
//!     .expiry(1.0)
//!     .rate(0.05)
//!     .vol(0.2)
//!     .steps(100)
//!     .build()
//!     .unwrap();
//! let px = binomial_price(&params).unwrap();
//! assert!(px > 6.0 && px < 6.2);
//! ```
//!
//! Refine the step count until prices settle:
//! ```rust
//! use openlattice::core::OptionParams;
//! use openlattice::engines::tree::{ConvergenceConfig, converge};
//!
//! let params = OptionParams::builder()
//!     .spot(100.0)
//!     .strike(110.0)
//!     .expiry(0.5)
//!     .rate(0.03)
//!     .vol(0.25)
//!     .steps(1)
//!     .build()
//!     .unwrap();
//! let report = converge(&params, &ConvergenceConfig::default()).unwrap();
//! assert!(report.converged && report.steps <= 2000);
//! ```
//!
//! Invert a lattice price and estimate Greeks:
//! ```rust
//! use openlattice::core::OptionParams;
//! use openlattice::greeks::{GreekBumps, greeks};
//! use openlattice::vol::{ImpliedVolConfig, implied_volatility};
//!
//! let params = OptionParams::builder()
//!     .spot(100.0)
//!     .strike(100.0)
//!     .expiry(1.0)
//!     .rate(0.05)
//!     .dividend_yield(0.02)
//!     .vol(0.2)
//!     .steps(100)
//!     .build()
//!     .unwrap();
//! let g = greeks(&params, &GreekBumps::default()).unwrap();
//! let iv = implied_volatility(g.price, &params, &ImpliedVolConfig::default()).unwrap();
//! assert!((iv - 0.2).abs() < 1e-6);
//! ```

pub mod batch;
pub mod core;
pub mod engines;
pub mod greeks;
pub mod math;
pub mod validation;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::batch::*;
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::engines::tree::*;
    pub use crate::greeks::*;
    pub use crate::vol::*;
}
