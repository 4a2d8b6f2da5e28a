//! Prices the reference European call and American put, then runs the convergence
//! driver, implied-vol solver and Greeks estimator on the put.
//!
//! Run with `RUST_LOG=openlattice=debug cargo run --example binomial_demo` to see the
//! solver's diagnostic events.

use openlattice::core::{ExerciseStyle, OptionParams, OptionType, Result};
use openlattice::engines::analytic::black_scholes_merton_price;
use openlattice::engines::tree::{ConvergenceConfig, binomial_price, converge};
use openlattice::greeks::{GreekBumps, greeks};
use openlattice::vol::{ImpliedVolConfig, implied_volatility_report};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let call = OptionParams::builder()
        .option_type(OptionType::Call)
        .exercise(ExerciseStyle::European)
        .spot(100.0)
        .strike(100.0)
        .expiry(1.0)
        .rate(0.05)
        .vol(0.2)
        .steps(100)
        .build()?;
    let put = OptionParams {
        option_type: OptionType::Put,
        exercise: ExerciseStyle::American,
        ..call
    };

    let call_price = binomial_price(&call)?;
    let bs = black_scholes_merton_price(
        call.option_type,
        call.spot,
        call.strike,
        call.rate,
        call.dividend_yield,
        call.vol,
        call.expiry,
    );
    println!("European Call Option Price: {call_price:.2} (Black-Scholes {bs:.4})");

    let put_price = binomial_price(&put)?;
    println!("American Put Option Price: {put_price:.2}");

    let report = converge(&put, &ConvergenceConfig::default())?;
    println!(
        "Converged American Put: {:.4} at n={} (converged: {})",
        report.price, report.steps, report.converged
    );

    let solution = implied_volatility_report(put_price, &put, &ImpliedVolConfig::default())?;
    println!(
        "Implied Volatility: {:.6} after {} iterations",
        solution.vol, solution.iterations
    );

    let g = greeks(&put, &GreekBumps::default())?;
    println!(
        "Greeks: price={:.4} delta={:.4} gamma={:.4} theta(dV/dT)={:.4}",
        g.price, g.delta, g.gamma, g.theta
    );

    Ok(())
}
