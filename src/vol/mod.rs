//! Volatility inversion against the lattice pricer.
//!
//! The solver brackets on the volatility axis and inverts whatever [`crate::core::OptionPricer`]
//! it is given, so American prices invert as readily as European ones.

pub mod implied;

pub use implied::{
    ImpliedVolConfig, ImpliedVolSolution, arbitrage_free_vol_floor, implied_volatility,
    implied_volatility_report, implied_volatility_with,
};
