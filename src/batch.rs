//! Batch pricing over independent parameter sets.
//!
//! Each entry is priced on its own lattice buffer; one failing entry does not affect the
//! others. Results are returned in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{OptionParams, OptionPricer, Result};
use crate::engines::tree::BinomialTreeEngine;

/// Sequential batch pricing on the CRR lattice.
///
/// # Examples
/// ```
/// use openlattice::batch::price_batch;
/// use openlattice::core::OptionParams;
///
/// let base = OptionParams::builder()
///     .spot(100.0)
///     .strike(100.0)
///     .expiry(1.0)
///     .rate(0.05)
///     .vol(0.2)
///     .steps(50)
///     .build()
///     .unwrap();
/// let results = price_batch(&[base, base.with_spot(-1.0)]);
/// assert!(results[0].is_ok());
/// assert!(results[1].is_err());
/// ```
pub fn price_batch(params: &[OptionParams]) -> Vec<Result<f64>> {
    price_batch_with(&BinomialTreeEngine, params)
}

/// [`price_batch`] over an arbitrary pricer.
pub fn price_batch_with<P>(pricer: &P, params: &[OptionParams]) -> Vec<Result<f64>>
where
    P: OptionPricer + ?Sized,
{
    params.iter().map(|p| pricer.price(p)).collect()
}

/// Parallel batch pricing on the CRR lattice using Rayon `par_iter`.
#[cfg(feature = "parallel")]
pub fn price_batch_parallel(params: &[OptionParams]) -> Vec<Result<f64>> {
    let engine = BinomialTreeEngine;
    params.par_iter().map(|p| engine.price(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExerciseStyle, OptionType, PricingError};
    use crate::engines::tree::binomial_price;

    fn grid() -> Vec<OptionParams> {
        let base = OptionParams {
            option_type: OptionType::Put,
            exercise: ExerciseStyle::American,
            spot: 100.0,
            strike: 100.0,
            expiry: 0.5,
            rate: 0.03,
            vol: 0.25,
            dividend_yield: 0.01,
            steps: 80,
        };
        [80.0, 90.0, 100.0, 110.0, 120.0]
            .into_iter()
            .map(|spot| base.with_spot(spot))
            .collect()
    }

    #[test]
    fn batch_matches_single_calls_in_order() {
        let params = grid();
        let results = price_batch(&params);
        assert_eq!(results.len(), params.len());
        for (p, r) in params.iter().zip(&results) {
            assert_eq!(*r.as_ref().unwrap(), binomial_price(p).unwrap());
        }
    }

    #[test]
    fn failures_stay_local_to_their_entry() {
        let mut params = grid();
        params[1].vol = 0.0;
        params[3].strike = -5.0;
        let results = price_batch(&params);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PricingError::DegenerateModel(_))));
        assert!(results[2].is_ok());
        assert!(matches!(results[3], Err(PricingError::InvalidParameter(_))));
        assert!(results[4].is_ok());
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(price_batch(&[]).is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_batch_matches_sequential() {
        let params = grid();
        assert_eq!(price_batch_parallel(&params), price_batch(&params));
    }
}
