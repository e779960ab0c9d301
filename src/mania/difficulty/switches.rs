use crate::{mania::difficulty::sequence::NoteSequence, util::float_ext::FloatExt};

/// How much the local rhythm deviates from its surroundings, with a larger
/// effect on wider active hands.
pub struct SwitchEvaluator;

impl SwitchEvaluator {
    const WINDOW: usize = 50;

    /// `base` and `key_counts` give the active key count over time.
    pub fn evaluate(seq: &NoteSequence, base: &[f64], key_counts: &[f64]) -> f64 {
        let key_count_at = |time: i32| {
            let idx = base
                .partition_point(|&corner| corner <= f64::from(time))
                .saturating_sub(1);

            key_counts.get(idx).copied().unwrap_or(1.0)
        };

        let streams = [seq.head_gaps(), seq.tail_gaps()];
        let mut weighted = 0.0;
        let mut total = 0;

        for gaps in streams.iter().filter(|gaps| !gaps.is_empty()) {
            let values: Vec<f64> = gaps.iter().map(|&(_, gap)| f64::from(gap)).collect();
            let key_counts: Vec<f64> = gaps.iter().map(|&(start, _)| key_count_at(start)).collect();

            weighted += Self::ratio(&values, &key_counts) * values.len() as f64;
            total += values.len();
        }

        let ratio = if total == 0 {
            1.0
        } else {
            weighted / total as f64
        };

        0.5 + ratio / 2.0
    }

    /// Signature over reference signature of one gap stream.
    fn ratio(gaps: &[f64], key_counts: &[f64]) -> f64 {
        let averages = local_averages(gaps, Self::WINDOW);

        let mut signature = 0.0;
        let mut reference = 0.0;

        for ((&gap, &avg), &key_count) in gaps.iter().zip(averages.iter()).zip(key_counts) {
            if avg <= 0.0 {
                continue;
            }

            let relative = gap / avg;
            signature += gap * relative.powf(key_count / 2.0);
            reference += gap * relative.sqrt();
        }

        if FloatExt::eq(reference, 0.0) {
            1.0
        } else {
            signature / reference
        }
    }
}

/// Mean over the `±window` neighbourhood of every element.
fn local_averages(values: &[f64], window: usize) -> Vec<f64> {
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);

    for value in values {
        prefix.push(prefix[prefix.len() - 1] + value);
    }

    (0..values.len())
        .map(|i| {
            let from = i.saturating_sub(window);
            let to = (i + window + 1).min(values.len());

            (prefix[to] - prefix[from]) / (to - from) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        mania::difficulty::{corners::CornerGrids, evaluators::key_usage::KeyUsage},
        model::hit_object::ManiaNote,
    };

    use super::*;

    fn switches(notes: Vec<ManiaNote>, key_count: usize) -> f64 {
        let seq = NoteSequence::new(key_count, notes);
        let grids = CornerGrids::new(&seq);
        let usage = KeyUsage::new(&seq, &grids.base);

        SwitchEvaluator::evaluate(&seq, &grids.base, &usage.key_counts)
    }

    #[test]
    fn uniform_rhythm() {
        let notes = (0..4).map(|i| ManiaNote::tap(0, i * 200)).collect();

        assert!(switches(notes, 1).almost_eq(1.0, 1e-12));
    }

    #[test]
    fn single_note() {
        assert!(switches(vec![ManiaNote::tap(0, 0)], 1).almost_eq(1.0, 0.0));
    }

    #[test]
    fn window_averages() {
        let averages = local_averages(&[1.0, 2.0, 3.0, 4.0], 1);

        assert_eq!(averages, vec![1.5, 2.0, 3.0, 3.5]);
    }

    #[test]
    fn wide_hands_amplify_irregularity() {
        let gaps = [100.0, 300.0, 100.0, 300.0];

        let narrow = SwitchEvaluator::ratio(&gaps, &[1.0; 4]);
        let wide = SwitchEvaluator::ratio(&gaps, &[4.0; 4]);

        assert!(wide > narrow);
    }
}
