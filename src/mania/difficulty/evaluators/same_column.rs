use crate::{
    mania::difficulty::{corners::GridCursor, sequence::NoteSequence},
    util::smoothing::{smooth_on_corners, SmoothMode},
};

/// Jack pressure: consecutive notes in the same column.
pub struct SameColumnEvaluator;

/// Output of [`SameColumnEvaluator::evaluate`].
pub struct SameColumnPressure {
    /// Per column and corner: gap in seconds to the next note of the column.
    pub deltas: Vec<Vec<f64>>,
    /// Jack pressure combined across columns.
    pub jack: Vec<f64>,
}

impl SameColumnEvaluator {
    const LAMBDA_1: f64 = 0.11;
    const POWER_MEAN_EXPONENT: f64 = 5.0;
    pub const NO_GAP: f64 = 1e9;

    pub fn evaluate(seq: &NoteSequence, base: &[f64], leniency: f64) -> SameColumnPressure {
        let mut deltas = Vec::with_capacity(seq.key_count);
        let mut smoothed = Vec::with_capacity(seq.key_count);

        for column in seq.by_column.iter() {
            let mut jack = vec![0.0; base.len()];
            let mut delta = vec![Self::NO_GAP; base.len()];
            let mut cursor = GridCursor::new(base);

            if let Some(first) = column.first() {
                let mut left = cursor.seek(f64::from(first.head_time));

                for pair in column.windows(2) {
                    let right = cursor.seek(f64::from(pair[1].head_time));

                    if right > left {
                        let gap = 0.001 * f64::from(pair[1].head_time - pair[0].head_time);
                        let value = Self::jack_value(gap, leniency);

                        jack[left..right].fill(value);
                        delta[left..right].fill(gap);
                    }

                    left = right;
                }
            }

            smoothed.push(smooth_on_corners(
                base,
                &jack,
                500.0,
                0.001,
                SmoothMode::Sum,
            ));
            deltas.push(delta);
        }

        let jack = (0..base.len())
            .map(|i| {
                let mut numerator = 0.0;
                let mut denominator = 0.0;

                for (values, delta) in smoothed.iter().zip(deltas.iter()) {
                    let weight = delta[i].recip();
                    numerator += values[i].max(0.0).powf(Self::POWER_MEAN_EXPONENT) * weight;
                    denominator += weight;
                }

                (numerator / denominator.max(1e-9)).powf(Self::POWER_MEAN_EXPONENT.recip())
            })
            .collect();

        SameColumnPressure { deltas, jack }
    }

    fn jack_value(gap: f64, leniency: f64) -> f64 {
        gap.recip() * (gap + Self::LAMBDA_1 * leniency.powf(0.25)).recip() * jack_nerf(gap)
    }
}

fn jack_nerf(gap: f64) -> f64 {
    1.0 - 7e-5 * (0.15 + (gap - 0.08).abs()).powi(-4)
}

#[cfg(test)]
mod tests {
    use crate::{
        mania::difficulty::corners::CornerGrids, model::hit_object::ManiaNote,
        util::float_ext::FloatExt,
    };

    use super::*;

    #[test]
    fn nerf_is_strongest_at_80ms() {
        assert!(jack_nerf(0.08) < jack_nerf(0.05));
        assert!(jack_nerf(0.08) < jack_nerf(0.2));
        assert!(jack_nerf(0.08).almost_eq(1.0 - 7e-5 / 0.15_f64.powi(4), 1e-12));
    }

    #[test]
    fn gap_is_painted_between_heads() {
        let notes = vec![
            ManiaNote::tap(0, 0),
            ManiaNote::tap(0, 200),
            ManiaNote::tap(0, 400),
        ];
        let seq = NoteSequence::new(1, notes);
        let grids = CornerGrids::new(&seq);
        let pressure = SameColumnEvaluator::evaluate(&seq, &grids.base, 0.08);

        let at = |time: f64| grids.base.iter().position(|&c| c.almost_eq(time, 0.0)).unwrap();

        assert!(pressure.deltas[0][at(0.0)].almost_eq(0.2, 1e-12));
        assert!(pressure.deltas[0][at(201.0)].almost_eq(0.2, 1e-12));
        assert!(pressure.deltas[0][at(400.0)].almost_eq(SameColumnEvaluator::NO_GAP, 0.0));
        assert!(pressure.jack.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(pressure.jack[at(200.0)] > 0.0);
    }

    #[test]
    fn faster_jacks_are_harder() {
        let pressure = |gap: i32| {
            let notes = (0..8).map(|i| ManiaNote::tap(0, i * gap)).collect();
            let seq = NoteSequence::new(1, notes);
            let grids = CornerGrids::new(&seq);
            let pressure = SameColumnEvaluator::evaluate(&seq, &grids.base, 0.08);

            pressure.jack.iter().copied().fold(0.0, f64::max)
        };

        assert!(pressure(120) > pressure(240));
    }
}
