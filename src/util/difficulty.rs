use std::f64::consts::SQRT_2;

use crate::util::float_ext::FloatExt;

// `f64::exp` is not const
pub fn logistic(x: f64, midpoint_offset: f64, multiplier: f64, max_value: Option<f64>) -> f64 {
    max_value.unwrap_or(1.0) / (1.0 + f64::exp(multiplier * (midpoint_offset - x)))
}

/// Three-point interpolation of a difficulty setting in `0..=10`.
///
/// `min` is the value at 0, `mid` at 5, and `max` at 10.
pub fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid + (mid - min) * (difficulty - 5.0) / 5.0
    } else {
        mid
    }
}

pub fn erf(x: f64) -> f64 {
    #![expect(clippy::unreadable_literal, reason = "abramowitz-stegun constants")]

    if FloatExt::eq(x, 0.0) {
        return 0.0;
    }

    if x.is_infinite() {
        return x.signum();
    }

    if x.is_nan() {
        return f64::NAN;
    }

    // * Constants for approximation (Abramowitz and Stegun formula 7.1.26)
    let t = 1.0 / (1.0 + 0.3275911 * f64::abs(x));

    let tau = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));

    let erf = 1.0 - tau * f64::exp(-x * x);

    if x >= 0.0 { erf } else { -erf }
}

/// Probability that a zero-mean normal variable with the given deviation
/// lands within `[-window, window]`.
pub fn hit_probability(window: f64, deviation: f64) -> f64 {
    if deviation <= 0.0 {
        return if window > 0.0 { 1.0 } else { 0.0 };
    }

    erf(window / (SQRT_2 * deviation))
}

/// CDF of the normal distribution.
///
/// A zero deviation degenerates into a step at `mean`.
pub fn normal_cdf(mean: f64, deviation: f64, x: f64) -> f64 {
    if deviation <= 0.0 {
        return if x >= mean { 1.0 } else { 0.0 };
    }

    0.5 * (1.0 + erf((x - mean) / (SQRT_2 * deviation)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_range_hits_anchor_points() {
        assert!(difficulty_range(0.0, 64.0, 49.0, 34.0).almost_eq(64.0, 1e-12));
        assert!(difficulty_range(5.0, 64.0, 49.0, 34.0).almost_eq(49.0, 1e-12));
        assert!(difficulty_range(10.0, 64.0, 49.0, 34.0).almost_eq(34.0, 1e-12));
        assert!(difficulty_range(8.0, 64.0, 49.0, 34.0).almost_eq(40.0, 1e-12));
    }

    #[test]
    fn erf_is_odd_and_bounded() {
        for x in [0.1, 0.5, 1.0, 2.0, 4.0] {
            assert!(erf(x).almost_eq(-erf(-x), 1e-12));
            assert!(erf(x) > 0.0 && erf(x) <= 1.0);
        }

        assert!(erf(f64::INFINITY).almost_eq(1.0, 1e-12));
        assert!(erf(f64::NEG_INFINITY).almost_eq(-1.0, 1e-12));
        assert!(erf(1.0).almost_eq(0.842_700_79, 1e-6));
    }

    #[test]
    fn normal_cdf_degenerates_to_step() {
        assert!(normal_cdf(0.5, 0.0, 0.4).almost_eq(0.0, 1e-12));
        assert!(normal_cdf(0.5, 0.0, 0.5).almost_eq(1.0, 1e-12));
        assert!(normal_cdf(0.5, 0.1, 0.5).almost_eq(0.5, 1e-12));
    }

    #[test]
    fn hit_probability_without_deviation() {
        assert!(hit_probability(16.0, 0.0).almost_eq(1.0, 1e-12));
        assert!(hit_probability(16.0, 10.0) < hit_probability(16.0, 5.0));
    }
}
