//! Closed-form analytic pricing engines.

pub mod black_scholes;

pub use black_scholes::black_scholes_merton_price;
