use crate::util::float_ext::FloatExt;

/// Rewards usage spread over several columns and penalizes anchors, i.e.
/// one column carrying most of the local pattern.
pub struct AnchorEvaluator;

impl AnchorEvaluator {
    /// Anchor factor per corner given every column's 400ms usage.
    pub fn evaluate(usage_400: &[Vec<f64>], n_corners: usize) -> Vec<f64> {
        let mut counts = Vec::with_capacity(usage_400.len());

        (0..n_corners)
            .map(|i| {
                counts.clear();
                counts.extend(usage_400.iter().map(|column| column[i]));

                Self::evaluate_counts(&mut counts)
            })
            .collect()
    }

    fn evaluate_counts(counts: &mut Vec<f64>) -> f64 {
        counts.sort_unstable_by(|a, b| b.total_cmp(a));
        counts.retain(|&count| count > 0.0);

        let mut walk = 0.0;
        let mut max_walk = 0.0;

        for pair in counts.windows(2) {
            let ratio = pair[1] / pair[0];
            walk += pair[0] * (1.0 - 4.0 * (0.5 - ratio).powi(2));
            max_walk += pair[0];
        }

        let anchor = if FloatExt::eq(max_walk, 0.0) {
            0.0
        } else {
            walk / max_walk
        };

        1.0 + (anchor - 0.18).min(5.0 * (anchor - 0.22).powi(3))
    }
}
