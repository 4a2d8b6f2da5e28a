//! Error taxonomy shared by the pricer and every orchestrator built on it.

/// Reason a lattice configuration was rejected after validation passed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Degeneracy {
    /// Up and down factors coincide (`sigma * sqrt(dt)` rounds to zero).
    #[error("up factor equals down factor ({factor}); volatility is zero or vanishingly small")]
    FlatLattice { factor: f64 },
    /// Up factor overflowed (`sigma sqrt(dt)` beyond the range of `exp`).
    #[error("up factor {factor} is not finite")]
    NonFiniteFactor { factor: f64 },
    /// Risk-neutral probability fell outside `[0, 1]` or is not finite.
    #[error("risk-neutral probability {probability} is outside [0, 1]")]
    ProbabilityOutOfRange { probability: f64 },
    /// Backward induction produced a root value outside the range of `f64`.
    #[error("lattice price {price} is not finite")]
    NonFinitePrice { price: f64 },
}

/// Errors surfaced by the pricing API.
///
/// Non-convergence is deliberately absent: the convergence driver and the
/// implied-volatility solver report it through their result types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// Structurally invalid input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Valid inputs that produce an arbitrage-inconsistent lattice.
    #[error("degenerate model: {0}")]
    DegenerateModel(Degeneracy),
    /// Implied-volatility bounds do not contain the target price.
    #[error(
        "market price {target} is not bracketed by lattice prices [{low_price}, {high_price}]"
    )]
    NotBracketed {
        target: f64,
        low_price: f64,
        high_price: f64,
    },
}

impl PricingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

impl From<Degeneracy> for PricingError {
    fn from(reason: Degeneracy) -> Self {
        Self::DegenerateModel(reason)
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PricingError>;
