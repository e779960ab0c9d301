use crate::{
    mania::difficulty::{corners::GridCursor, sequence::NoteSequence},
    model::hit_object::ManiaNote,
    util::smoothing::{smooth_on_corners, SmoothMode},
};

/// Release pressure between consecutive long note tails.
pub struct ReleaseEvaluator;

impl ReleaseEvaluator {
    const LAMBDA_4: f64 = 0.1;
    const IDEAL_GAP: f64 = 80.0;

    pub fn evaluate(seq: &NoteSequence, base: &[f64], leniency: f64) -> Vec<f64> {
        let release = Self::unsmoothed(seq, base, leniency);

        smooth_on_corners(base, &release, 500.0, 0.001, SmoothMode::Sum)
    }

    fn unsmoothed(seq: &NoteSequence, base: &[f64], leniency: f64) -> Vec<f64> {
        let mut release = vec![0.0; base.len()];

        let spacing: Vec<f64> = seq
            .tails
            .iter()
            .map(|note| Self::spacing_index(seq, note, leniency))
            .collect();

        let mut cursor = GridCursor::new(base);

        if let Some(first) = seq.tails.first() {
            let mut left = cursor.seek(f64::from(first.end_time()));

            for (i, pair) in seq.tails.windows(2).enumerate() {
                let right = cursor.seek(f64::from(pair[1].end_time()));

                if right > left {
                    let gap = 0.001 * f64::from(pair[1].end_time() - pair[0].end_time());
                    let value = 0.08 * gap.powf(-0.5) / leniency
                        * (1.0 + Self::LAMBDA_4 * (spacing[i] + spacing[i + 1]));

                    release[left..right].fill(value);
                }

                left = right;
            }
        }

        release
    }

    /// How far the hold length and the release-to-next-press gap are from
    /// being comfortable, blended through a logistic.
    fn spacing_index(seq: &NoteSequence, note: &ManiaNote, leniency: f64) -> f64 {
        let head = f64::from(note.head_time);
        let tail = f64::from(note.end_time());
        let next_head = seq.next_head_in_column(note).map_or(1e9, f64::from);

        let hold = 0.001 * (tail - head - Self::IDEAL_GAP).abs() / leniency;
        let rest = 0.001 * (next_head - tail - Self::IDEAL_GAP).abs() / leniency;

        2.0 / (2.0 + (-5.0 * (hold - 0.75)).exp() + (-5.0 * (rest - 0.75)).exp())
    }
}
