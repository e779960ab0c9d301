use std::f64::consts::PI;

use crate::util::difficulty::normal_cdf;

/// Distribution of the number of successes among independent trials with
/// individual success probabilities.
///
/// The CDF uses the refined normal approximation, i.e. a normal
/// approximation with a skewness correction.
pub struct PoissonBinomial {
    mu: f64,
    sigma: f64,
    gamma: f64,
}

impl PoissonBinomial {
    /// Creates the distribution from `(probability, count)` pairs where
    /// `count` trials share the same `probability`.
    pub fn new(probabilities: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut mu = 0.0;
        let mut variance = 0.0;
        let mut gamma = 0.0;

        for (p, count) in probabilities {
            mu += count * p;
            variance += count * p * (1.0 - p);
            gamma += count * p * (1.0 - p) * (1.0 - 2.0 * p);
        }

        let sigma = variance.sqrt();

        if sigma > 0.0 {
            gamma /= sigma * sigma * sigma;
        } else {
            gamma = 0.0;
        }

        Self { mu, sigma, gamma }
    }

    /// Probability of at most `count` successes.
    pub fn cdf(&self, count: f64) -> f64 {
        if self.sigma <= 0.0 {
            return if count + 0.5 >= self.mu { 1.0 } else { 0.0 };
        }

        let k = (count + 0.5 - self.mu) / self.sigma;
        let density = (-0.5 * k * k).exp() / (2.0 * PI).sqrt();

        let result = normal_cdf(0.0, 1.0, k) + self.gamma * (1.0 - k * k) * density / 6.0;

        result.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    fn exact_cdf(probabilities: &[f64], count: usize) -> f64 {
        // dp[j] = P(exactly j successes so far)
        let mut dp = vec![0.0; probabilities.len() + 1];
        dp[0] = 1.0;

        for (i, p) in probabilities.iter().enumerate() {
            for j in (0..=i + 1).rev() {
                let stay = dp[j] * (1.0 - p);
                let step = if j > 0 { dp[j - 1] * p } else { 0.0 };
                dp[j] = stay + step;
            }
        }

        dp.iter().take(count + 1).sum()
    }

    #[test]
    fn close_to_exact_distribution() {
        let probabilities: Vec<_> = (0..200).map(|i| 0.01 + 0.002 * f64::from(i)).collect();
        let dist = PoissonBinomial::new(probabilities.iter().map(|&p| (p, 1.0)));

        for count in [40, 50, 60, 70] {
            let approx = dist.cdf(count as f64);
            let exact = exact_cdf(&probabilities, count);

            assert!(
                approx.almost_eq(exact, 0.01),
                "count={count}: approx={approx} exact={exact}"
            );
        }
    }

    #[test]
    fn degenerate_probabilities() {
        let dist = PoissonBinomial::new([(1.0, 3.0), (0.0, 10.0)]);

        assert!(dist.cdf(2.0).almost_eq(0.0, 1e-12));
        assert!(dist.cdf(3.0).almost_eq(1.0, 1e-12));
    }
}
