//! Tree-based pricing engines and the step-count convergence driver.

pub mod binomial;
pub mod convergence;

pub use binomial::{
    BinomialTreeEngine, LatticeParams, LatticeValuation, binomial_price, crr_price,
};
pub use convergence::{ConvergenceConfig, ConvergenceReport, converge, converge_with};
