use std::collections::BTreeMap;

use crate::mania::difficulty::sequence::NoteSequence;

/// Rhythmic variety as Rao's quadratic entropy over the gap distribution.
pub struct VarietyEvaluator;

impl VarietyEvaluator {
    const LOG_ITERATIONS: usize = 2;

    pub fn evaluate(seq: &NoteSequence) -> f64 {
        let heads: Vec<i32> = seq.head_gaps().into_iter().map(|(_, gap)| gap).collect();
        let tails: Vec<i32> = seq.tail_gaps().into_iter().map(|(_, gap)| gap).collect();

        let total = heads.len() + tails.len();

        if total == 0 {
            return 0.0;
        }

        let weighted = Self::rao_entropy(&heads) * heads.len() as f64
            + Self::rao_entropy(&tails) * tails.len() as f64;

        weighted / total as f64
    }

    /// `Σ_i Σ_j d(g_i, g_j)·p_i·p_j` over distinct gap values.
    fn rao_entropy(gaps: &[i32]) -> f64 {
        if gaps.is_empty() {
            return 0.0;
        }

        let mut counts = BTreeMap::new();

        for &gap in gaps {
            *counts.entry(gap).or_insert(0_usize) += 1;
        }

        let n = gaps.len() as f64;

        let categories: Vec<(f64, f64)> = counts
            .into_iter()
            .map(|(gap, count)| (f64::from(gap), count as f64 / n))
            .collect();

        let mut entropy = 0.0;

        for (i, &(a, p_a)) in categories.iter().enumerate() {
            for &(b, p_b) in categories[i + 1..].iter() {
                // symmetric, every unordered pair counts twice
                entropy += 2.0 * Self::distance(a, b) * p_a * p_b;
            }
        }

        entropy
    }

    fn distance(a: f64, b: f64) -> f64 {
        (0..Self::LOG_ITERATIONS).fold((a - b).abs(), |d, _| d.ln_1p())
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::hit_object::ManiaNote, util::float_ext::FloatExt};

    use super::*;

    #[test]
    fn uniform_gaps_have_no_variety() {
        let notes = (0..4).map(|i| ManiaNote::tap(0, i * 200)).collect();
        let seq = NoteSequence::new(1, notes);

        assert!(VarietyEvaluator::evaluate(&seq).almost_eq(0.0, 0.0));
    }

    #[test]
    fn two_gap_values() {
        let seq = NoteSequence::new(
            1,
            vec![
                ManiaNote::tap(0, 0),
                ManiaNote::tap(0, 100),
                ManiaNote::tap(0, 300),
            ],
        );

        let distance = 100.0_f64.ln_1p().ln_1p();

        assert!(VarietyEvaluator::evaluate(&seq).almost_eq(2.0 * distance * 0.25, 1e-12));
    }

    #[test]
    fn single_note_has_no_variety() {
        let seq = NoteSequence::new(1, vec![ManiaNote::hold(0, 0, 500)]);

        assert!(VarietyEvaluator::evaluate(&seq).almost_eq(0.0, 0.0));
    }
}
