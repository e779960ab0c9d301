use crate::{
    mania::difficulty::{
        corners::GridCursor, evaluators::key_usage::KeyUsage, sequence::NoteSequence,
    },
    model::hit_object::ManiaNote,
    util::smoothing::{smooth_on_corners, SmoothMode},
};

/// Pressure of alternating between neighbouring columns.
pub struct CrossColumnEvaluator;

impl CrossColumnEvaluator {
    const FALLBACK_WEIGHT: f64 = 0.4;

    /// Weight of every column boundary, including both outer edges.
    pub fn boundary_weights(key_count: usize) -> Vec<f64> {
        let row: &[f64] = match key_count {
            0 => &[-1.0],
            1 => &[0.075, 0.075],
            2 => &[0.125, 0.05, 0.125],
            3 => &[0.125, 0.125, 0.125, 0.125],
            4 => &[0.175, 0.25, 0.05, 0.25, 0.175],
            5 => &[0.175, 0.25, 0.175, 0.175, 0.25, 0.175],
            6 => &[0.225, 0.35, 0.25, 0.05, 0.25, 0.35, 0.225],
            7 => &[0.225, 0.35, 0.25, 0.225, 0.225, 0.25, 0.35, 0.225],
            8 => &[0.275, 0.45, 0.35, 0.25, 0.05, 0.25, 0.35, 0.45, 0.275],
            9 => &[0.275, 0.45, 0.35, 0.25, 0.275, 0.275, 0.25, 0.35, 0.45, 0.275],
            10 => &[
                0.625, 0.55, 0.45, 0.35, 0.25, 0.05, 0.25, 0.35, 0.45, 0.55, 0.625,
            ],
            _ => return vec![Self::FALLBACK_WEIGHT; key_count + 1],
        };

        row.to_vec()
    }

    pub fn evaluate(
        seq: &NoteSequence,
        base: &[f64],
        usage: &KeyUsage,
        leniency: f64,
    ) -> Vec<f64> {
        let combined = Self::unsmoothed(seq, base, usage, leniency);

        smooth_on_corners(base, &combined, 500.0, 0.001, SmoothMode::Sum)
    }

    /// Weighted cross pressure per corner before smoothing.
    fn unsmoothed(
        seq: &NoteSequence,
        base: &[f64],
        usage: &KeyUsage,
        leniency: f64,
    ) -> Vec<f64> {
        let key_count = seq.key_count;
        let weights = Self::boundary_weights(key_count);

        let mut cross = vec![vec![0.0; base.len()]; key_count + 1];
        let mut fast_cross = vec![vec![0.0; base.len()]; key_count + 1];

        for boundary in 0..=key_count {
            let left_column = boundary.checked_sub(1);
            let right_column = (boundary < key_count).then_some(boundary);

            let merged = merge_columns(
                left_column.map_or(&[][..], |k| &seq.by_column[k]),
                right_column.map_or(&[][..], |k| &seq.by_column[k]),
            );

            let Some(first) = merged.first() else {
                continue;
            };

            let is_active = |column: Option<usize>, idx: usize| {
                column.is_some_and(|k| usage.is_active(k, idx))
            };

            let mut cursor = GridCursor::new(base);
            let mut left = cursor.seek(f64::from(first.head_time));

            for pair in merged.windows(2) {
                let right = cursor.seek(f64::from(pair[1].head_time));

                // Chords are covered by the press spike
                if right == left {
                    continue;
                }

                let gap = 0.001 * f64::from(pair[1].head_time - pair[0].head_time);
                let mut value = 0.16 * leniency.max(gap).powi(-2);

                let left_idle = !is_active(left_column, left) && !is_active(left_column, right);
                let right_idle = !is_active(right_column, left) && !is_active(right_column, right);

                if left_idle || right_idle {
                    value *= 1.0 - weights[boundary];
                }

                let fast = 0.4 * gap.max(0.06).max(0.75 * leniency).powi(-2) - 80.0;

                cross[boundary][left..right].fill(value);
                fast_cross[boundary][left..right].fill(fast.max(0.0));

                left = right;
            }
        }

        (0..base.len())
            .map(|i| {
                let direct: f64 = (0..=key_count)
                    .map(|k| cross[k][i] * weights[k])
                    .sum();

                let chained: f64 = (0..key_count)
                    .map(|k| {
                        (fast_cross[k][i] * weights[k] * fast_cross[k + 1][i] * weights[k + 1])
                            .max(0.0)
                            .sqrt()
                    })
                    .sum();

                direct + chained
            })
            .collect()
    }
}

fn merge_columns(left: &[ManiaNote], right: &[ManiaNote]) -> Vec<ManiaNote> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    merged.extend_from_slice(left);
    merged.extend_from_slice(right);
    merged.sort_by_key(|note| note.head_time);

    merged
}

#[cfg(test)]
mod tests {
    use crate::{mania::difficulty::corners::CornerGrids, util::float_ext::FloatExt};

    use super::*;

    fn cross(notes: Vec<ManiaNote>, key_count: usize) -> (CornerGrids, Vec<f64>) {
        let seq = NoteSequence::new(key_count, notes);
        let grids = CornerGrids::new(&seq);
        let usage = KeyUsage::new(&seq, &grids.base);
        let cross = CrossColumnEvaluator::evaluate(&seq, &grids.base, &usage, 0.08);

        (grids, cross)
    }

    #[test]
    fn weight_rows_have_boundary_count() {
        for key_count in 1..=12 {
            assert_eq!(
                CrossColumnEvaluator::boundary_weights(key_count).len(),
                key_count + 1
            );
        }

        assert!(CrossColumnEvaluator::boundary_weights(12)[3].almost_eq(0.4, 0.0));
    }

    #[test]
    fn chord_is_skipped() {
        let (_, cross) = cross(vec![ManiaNote::tap(0, 1000), ManiaNote::tap(1, 1000)], 2);

        assert!(cross.iter().all(|v| v.almost_eq(0.0, 0.0)));
    }

    fn unsmoothed(notes: Vec<ManiaNote>, key_count: usize) -> (CornerGrids, Vec<f64>) {
        let seq = NoteSequence::new(key_count, notes);
        let grids = CornerGrids::new(&seq);
        let usage = KeyUsage::new(&seq, &grids.base);
        let values = CrossColumnEvaluator::unsmoothed(&seq, &grids.base, &usage, 0.08);

        (grids, values)
    }

    #[test]
    fn single_alternation() {
        let (grids, values) = unsmoothed(vec![ManiaNote::tap(0, 0), ManiaNote::tap(1, 100)], 2);

        assert_eq!(grids.base, vec![0.0, 1.0, 100.0, 101.0]);

        // 0.16 / 0.1² on the middle boundary, weight 0.05
        let expected = 0.16 / 0.1_f64.powi(2) * 0.05;

        assert!(values[0].almost_eq(expected, 1e-12), "{values:?}");
        assert!(values[1].almost_eq(expected, 1e-12));
        assert!(values[2].almost_eq(0.0, 0.0));
        assert!(values[3].almost_eq(0.0, 0.0));
    }

    #[test]
    fn idle_columns_are_penalized() {
        let notes = vec![
            ManiaNote::tap(0, 0),
            ManiaNote::tap(0, 1000),
            ManiaNote::tap(1, 2000),
        ];
        let (grids, values) = unsmoothed(notes, 2);

        assert_eq!(
            grids.base,
            vec![0.0, 1.0, 501.0, 1000.0, 1001.0, 1501.0, 2000.0, 2001.0]
        );

        let [outer, middle, _] = [0.125, 0.05, 0.125];
        let value = 0.16 / 1.0_f64.powi(2);

        // Column 1 is idle between 0 and 1000 and the left edge is always idle
        let first = value * (1.0 - middle) * middle + value * (1.0 - outer) * outer;
        let second = value * middle;

        for i in 0..3 {
            assert!(values[i].almost_eq(first, 1e-12), "{i}: {values:?}");
        }

        for i in 3..6 {
            assert!(values[i].almost_eq(second, 1e-12), "{i}: {values:?}");
        }

        assert!(values[6].almost_eq(0.0, 0.0));
    }

    #[test]
    fn fast_crosses_chain_neighbouring_boundaries() {
        let notes = vec![
            ManiaNote::tap(0, 0),
            ManiaNote::tap(1, 25),
            ManiaNote::tap(0, 50),
        ];
        let (grids, values) = unsmoothed(notes, 2);

        assert_eq!(grids.base, vec![0.0, 1.0, 25.0, 26.0, 50.0, 51.0]);

        let [outer, middle, _] = [0.125, 0.05, 0.125];

        // Both gaps are below 60ms so the fast term is clamped
        let fast = 0.4 / 0.06_f64.powi(2) - 80.0;
        let chained = (fast * outer * fast * middle).sqrt();

        // Gaps of 25ms and 50ms are both below the leniency of 80ms
        let value = 0.16 / 0.08_f64.powi(2);
        let direct = value * (1.0 - outer) * outer + value * middle;

        for i in 0..4 {
            assert!(values[i].almost_eq(direct + chained, 1e-9), "{i}: {values:?}");
        }

        assert!(values[4].almost_eq(0.0, 0.0));
    }

    #[test]
    fn trill_has_cross_pressure() {
        let notes = (0..16).map(|i| ManiaNote::tap((i % 2) as usize, i * 100)).collect();
        let (grids, cross) = cross(notes, 2);

        let mid = grids.base.iter().position(|&c| c.almost_eq(800.0, 0.0)).unwrap();

        assert!(cross[mid] > 0.0);
        assert!(cross.iter().all(|v| v.is_finite()));
    }
}
