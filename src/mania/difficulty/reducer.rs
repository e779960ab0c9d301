use crate::{
    mania::difficulty::aggregator::{CornerSignals, CornerStrain},
    util::float_ext::FloatExt,
};

/// Everything known about one corner of the final grid.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CornerData {
    pub time: f64,
    pub signals: CornerSignals,
    pub strain: CornerStrain,
    /// Corner width times local density.
    pub weight: f64,
}

/// Scalar summary of the difficulty curve.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ReducedDifficulty {
    pub stars: f64,
    pub percentile_93: f64,
    pub percentile_83: f64,
    pub weighted_mean: f64,
    pub spikiness: f64,
}

pub struct DifficultyReducer;

impl DifficultyReducer {
    const PERCENTILES_93: [f64; 4] = [0.945, 0.935, 0.925, 0.915];
    const PERCENTILES_83: [f64; 4] = [0.845, 0.835, 0.825, 0.815];
    const MEAN_EXPONENT: f64 = 4.0;
    const SPIKE_EXPONENT: i32 = 8;
    const P_0: f64 = 1.0;
    const LENGTH_BIAS: f64 = 60.0;
    const CALIBRATION: f64 = 0.975;

    /// Trapezoidal width of every corner times its density.
    pub fn corner_weights(grid: &[f64], density: &[f64]) -> Vec<f64> {
        let n = grid.len();

        (0..n)
            .map(|i| {
                let prev = grid[i.saturating_sub(1)];
                let next = grid[(i + 1).min(n - 1)];

                (next - prev) / 2.0 * density[i]
            })
            .collect()
    }

    pub fn reduce(corners: &[CornerData], total_notes: f64) -> ReducedDifficulty {
        if corners.is_empty() {
            return ReducedDifficulty::default();
        }

        let mut sorted: Vec<(f64, f64)> = corners
            .iter()
            .map(|corner| (corner.strain.d, corner.weight))
            .collect();

        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let total_weight: f64 = sorted.iter().map(|(_, weight)| weight).sum();

        let (percentile_93, percentile_83) = if sorted.len() < 8 || total_weight <= 0.0 {
            let mean = sorted.iter().map(|(d, _)| d).sum::<f64>() / sorted.len() as f64;

            (mean, mean)
        } else {
            let mut cumulative = Vec::with_capacity(sorted.len());
            let mut acc = 0.0;

            for (_, weight) in sorted.iter() {
                acc += weight;
                cumulative.push(acc / total_weight);
            }

            let band = |targets: &[f64; 4]| {
                let sum: f64 = targets
                    .iter()
                    .map(|&target| {
                        let idx = cumulative
                            .partition_point(|&c| c < target)
                            .min(sorted.len() - 1);

                        sorted[idx].0
                    })
                    .sum();

                sum / targets.len() as f64
            };

            (band(&Self::PERCENTILES_93), band(&Self::PERCENTILES_83))
        };

        let weighted_mean = if total_weight > 0.0 {
            let sum: f64 = sorted
                .iter()
                .map(|(d, weight)| d.powf(Self::MEAN_EXPONENT) * weight)
                .sum();

            (sum / total_weight).powf(Self::MEAN_EXPONENT.recip())
        } else {
            0.0
        };

        let spikiness = Self::spikiness(&sorted, total_weight, weighted_mean);

        let mut stars =
            0.88 * percentile_93 * 0.25 + 0.94 * percentile_83 * 0.2 + weighted_mean * 0.55;
        stars = stars.powf(Self::P_0) / 8.0_f64.powf(Self::P_0) * 8.0;
        stars *= total_notes / (total_notes + Self::LENGTH_BIAS);
        stars = rescale_high(stars) * Self::CALIBRATION;

        log::debug!(
            "reduced {} corners: p93={percentile_93} p83={percentile_83} mean={weighted_mean}",
            corners.len()
        );

        ReducedDifficulty {
            stars,
            percentile_93,
            percentile_83,
            weighted_mean,
            spikiness,
        }
    }

    fn spikiness(sorted: &[(f64, f64)], total_weight: f64, weighted_mean: f64) -> f64 {
        if total_weight <= 0.0 || FloatExt::eq(weighted_mean, 0.0) {
            return 0.0;
        }

        let mean_pow = weighted_mean.powi(Self::SPIKE_EXPONENT);

        let sum: f64 = sorted
            .iter()
            .map(|(d, weight)| (d.powi(Self::SPIKE_EXPONENT) - mean_pow).powi(2) * weight)
            .sum();

        let variance = (sum / total_weight).powf(f64::from(Self::SPIKE_EXPONENT).recip());

        variance.sqrt() / weighted_mean
    }
}

/// Compresses ratings above 9.
pub fn rescale_high(stars: f64) -> f64 {
    if stars <= 9.0 {
        stars
    } else {
        9.0 + (stars - 9.0) / 1.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(d: f64, weight: f64) -> CornerData {
        CornerData {
            strain: CornerStrain {
                d,
                ..Default::default()
            },
            weight,
            ..Default::default()
        }
    }

    #[test]
    fn trapezoidal_weights() {
        let weights = DifficultyReducer::corner_weights(&[0.0, 10.0, 30.0], &[1.0, 2.0, 1.0]);

        assert_eq!(weights, vec![5.0, 30.0, 10.0]);
    }

    #[test]
    fn few_corners_use_plain_mean() {
        let corners = [corner(1.0, 0.0), corner(3.0, 0.0)];
        let reduced = DifficultyReducer::reduce(&corners, 1.0);

        assert!(reduced.percentile_93.almost_eq(2.0, 1e-12));
        assert!(reduced.percentile_83.almost_eq(2.0, 1e-12));
        assert!(reduced.weighted_mean.almost_eq(0.0, 0.0));
        assert!(reduced.spikiness.almost_eq(0.0, 0.0));
        assert!(reduced.stars.is_finite());
    }

    #[test]
    fn percentiles_pick_from_top() {
        let corners: Vec<_> = (1..=100).map(|d| corner(f64::from(d), 1.0)).collect();
        let reduced = DifficultyReducer::reduce(&corners, 1e12);

        // first index with cumulative weight >= 0.945 is d = 95
        assert!(reduced.percentile_93.almost_eq((95.0 + 94.0 + 93.0 + 92.0) / 4.0, 1e-9));
        assert!(reduced.percentile_83.almost_eq((85.0 + 84.0 + 83.0 + 82.0) / 4.0, 1e-9));
    }

    #[test]
    fn flat_curve_has_no_spikes() {
        let corners: Vec<_> = (0..20).map(|_| corner(1.0, 2.0)).collect();
        let reduced = DifficultyReducer::reduce(&corners, 100.0);

        assert!(reduced.weighted_mean.almost_eq(1.0, 1e-12));
        assert!(reduced.spikiness.almost_eq(0.0, 1e-12));

        let expected = (0.88 * 0.25 + 0.94 * 0.2 + 0.55) * 100.0 / 160.0 * 0.975;
        assert!(reduced.stars.almost_eq(expected, 1e-12));
    }

    #[test]
    fn high_ratings_are_compressed() {
        assert!(rescale_high(8.0).almost_eq(8.0, 0.0));
        assert!(rescale_high(10.2).almost_eq(10.0, 1e-12));
    }
}
