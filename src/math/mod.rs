//! Standard normal distribution helper.

use std::f64::consts::SQRT_2;

use statrs::function::erf::erfc;

/// `Phi(x)` via the complementary error function, accurate in both tails.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cdf_matches_reference_values() {
        let reference = [
            (-3.0, 0.001_349_898_031_630_094_6),
            (-1.0, 0.158_655_253_931_457_02),
            (0.0, 0.5),
            (0.5, 0.691_462_461_274_013_1),
            (2.0, 0.977_249_868_051_820_8),
        ];
        for (x, expected) in reference {
            assert_relative_eq!(normal_cdf(x), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn cdf_is_symmetric() {
        for x in [0.1, 0.75, 1.96, 4.0] {
            assert_relative_eq!(normal_cdf(x) + normal_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }
}
