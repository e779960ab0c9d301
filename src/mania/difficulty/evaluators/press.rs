use crate::{
    mania::difficulty::{corners::GridCursor, sequence::NoteSequence},
    util::smoothing::{smooth_on_corners, SmoothMode},
};

/// Press intensity of the global head stream.
pub struct PressEvaluator;

impl PressEvaluator {
    const LAMBDA_2: f64 = 7.0;
    const LAMBDA_3: f64 = 24.0;

    pub fn evaluate(seq: &NoteSequence, base: &[f64], anchor: &[f64], leniency: f64) -> Vec<f64> {
        let press = Self::unsmoothed(seq, base, anchor, leniency);

        smooth_on_corners(base, &press, 500.0, 0.001, SmoothMode::Sum)
    }

    /// Press intensity per corner before smoothing.
    fn unsmoothed(seq: &NoteSequence, base: &[f64], anchor: &[f64], leniency: f64) -> Vec<f64> {
        let bodies = LongNoteBodies::new(seq);
        let mut press = vec![0.0; base.len()];
        let mut cursor = GridCursor::new(base);

        let spike = 1000.0 * (0.02 * (4.0 / leniency - Self::LAMBDA_3)).max(0.0).powf(0.25);

        for pair in seq.notes.windows(2) {
            let (head, next) = (pair[0].head_time, pair[1].head_time);
            let left = cursor.seek(f64::from(head));

            if head == next {
                // Corners at exactly the chord's time
                let right = cursor.peek(f64::from(head) + 1.0);

                for value in press[left..right].iter_mut() {
                    *value += spike;
                }

                continue;
            }

            let right = cursor.peek(f64::from(next));

            if right == left {
                continue;
            }

            let gap = 0.001 * f64::from(next - head);
            let body = 1.0 + Self::LAMBDA_2 * 0.001 * bodies.sum(f64::from(head), f64::from(next));
            let booster = stream_booster(gap);

            let rate = if gap < 2.0 * leniency / 3.0 {
                (0.08 / leniency * (1.0 - Self::LAMBDA_3 / leniency * (gap - leniency / 2.0).powi(2)))
                    .max(0.0)
                    .powf(0.25)
            } else {
                (0.08 / leniency * (1.0 - Self::LAMBDA_3 / leniency * (leniency / 6.0).powi(2)))
                    .max(0.0)
                    .powf(0.25)
            };

            let increment = gap.recip() * rate * booster * body;

            for (value, &anchor) in press[left..right].iter_mut().zip(&anchor[left..right]) {
                *value += (increment * anchor).min(increment.max(2.0 * increment - 10.0));
            }
        }

        press
    }
}

/// Bump for streams between 160 and 360 "bpm".
fn stream_booster(gap: f64) -> f64 {
    let bpm = 7.5 / gap;

    if 160.0 < bpm && bpm < 360.0 {
        1.0 + 1.7e-7 * (bpm - 160.0) * (360.0 - bpm).powi(2)
    } else {
        1.0
    }
}

/// Piecewise constant density of held long note bodies.
///
/// The first 60ms of a body count 1.3, the next 60ms 1.0, the remainder 0.
/// Overlapping bodies stack with diminishing returns.
struct LongNoteBodies {
    points: Vec<f64>,
    prefix: Vec<f64>,
    values: Vec<f64>,
}

impl LongNoteBodies {
    fn new(seq: &NoteSequence) -> Self {
        let mut diffs: Vec<(i32, f64)> = Vec::with_capacity(3 * seq.long_notes.len());

        for note in seq.long_notes.iter() {
            let (head, tail) = (note.head_time, note.end_time());

            diffs.push(((head + 60).min(tail), 1.3));
            diffs.push(((head + 120).min(tail), -0.3));
            diffs.push((tail, -1.0));
        }

        diffs.sort_unstable_by_key(|(time, _)| *time);

        let end = seq.end as i32;
        let mut points: Vec<i32> = diffs.iter().map(|(time, _)| *time).chain([0, end]).collect();
        points.sort_unstable();
        points.dedup();

        let mut values = Vec::with_capacity(points.len() - 1);
        let mut current = 0.0;
        let mut j = 0;

        for &point in points[..points.len() - 1].iter() {
            while j < diffs.len() && diffs[j].0 <= point {
                current += diffs[j].1;
                j += 1;
            }

            values.push(f64::min(current, 2.5 + 0.5 * current));
        }

        let points: Vec<f64> = points.into_iter().map(f64::from).collect();
        let mut prefix = vec![0.0; points.len()];

        for i in 1..points.len() {
            prefix[i] = prefix[i - 1] + values[i - 1] * (points[i] - points[i - 1]);
        }

        Self {
            points,
            prefix,
            values,
        }
    }

    /// Integral of the body density over `[from, to]`.
    fn sum(&self, from: f64, to: f64) -> f64 {
        self.integral_to(to) - self.integral_to(from)
    }

    fn integral_to(&self, time: f64) -> f64 {
        let idx = self
            .points
            .partition_point(|&point| point <= time)
            .saturating_sub(1)
            .min(self.values.len().saturating_sub(1));

        match self.values.get(idx) {
            Some(value) => self.prefix[idx] + value * (time - self.points[idx]),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        mania::difficulty::corners::CornerGrids, model::hit_object::ManiaNote,
        util::float_ext::FloatExt,
    };

    use super::*;

    #[test]
    fn booster_window() {
        assert!(stream_booster(0.1).almost_eq(1.0, 0.0));
        assert!(stream_booster(0.03) > 1.0);
        assert!(stream_booster(7.5 / 400.0).almost_eq(1.0, 0.0));
    }

    #[test]
    fn body_density() {
        let seq = NoteSequence::new(
            2,
            vec![ManiaNote::hold(0, 0, 1000), ManiaNote::tap(1, 2000)],
        );
        let bodies = LongNoteBodies::new(&seq);

        assert!(bodies.sum(0.0, 60.0).almost_eq(0.0, 1e-12));
        assert!(bodies.sum(60.0, 120.0).almost_eq(60.0 * 1.3, 1e-12));
        assert!(bodies.sum(120.0, 1000.0).almost_eq(880.0, 1e-12));
        assert!(bodies.sum(1000.0, 2000.0).almost_eq(0.0, 1e-12));
    }

    fn unsmoothed(notes: Vec<ManiaNote>, anchor: f64) -> (Vec<f64>, Vec<f64>) {
        let seq = NoteSequence::new(2, notes);
        let grids = CornerGrids::new(&seq);
        let anchor = vec![anchor; grids.base.len()];
        let press = PressEvaluator::unsmoothed(&seq, &grids.base, &anchor, 0.08);

        (grids.base, press)
    }

    #[test]
    fn chord_spike_value() {
        let (base, press) = unsmoothed(vec![ManiaNote::tap(0, 1000), ManiaNote::tap(1, 1000)], 1.0);

        assert_eq!(base, vec![0.0, 501.0, 1000.0, 1001.0]);

        let spike = 1000.0 * (0.02_f64 * (4.0 / 0.08 - 24.0)).powf(0.25);

        assert!(press[2].almost_eq(spike, 1e-9), "{press:?}");
        assert!(press[0].almost_eq(0.0, 0.0));
        assert!(press[1].almost_eq(0.0, 0.0));
        assert!(press[3].almost_eq(0.0, 0.0));
    }

    #[test]
    fn anchor_clamps_increment() {
        let notes = vec![ManiaNote::tap(0, 0), ManiaNote::tap(1, 50)];

        // 50ms is below 2/3 of the leniency
        let rate = (0.08 / 0.08 * (1.0 - 24.0 / 0.08 * (0.05 - 0.04_f64).powi(2))).powf(0.25);
        let increment = rate / 0.05;
        assert!(increment > 10.0);

        let (base, plain) = unsmoothed(notes.clone(), 1.0);
        assert_eq!(base, vec![0.0, 1.0, 50.0, 51.0]);

        assert!(plain[0].almost_eq(increment, 1e-9), "{plain:?}");
        assert!(plain[1].almost_eq(increment, 1e-9));
        assert!(plain[2].almost_eq(0.0, 0.0));

        // min(3·inc, max(inc, 2·inc − 10))
        let (_, anchored) = unsmoothed(notes, 3.0);

        assert!(anchored[0].almost_eq(2.0 * increment - 10.0, 1e-9), "{anchored:?}");
    }

    #[test]
    fn long_note_body_scales_increment() {
        let notes = vec![ManiaNote::hold(0, 0, 300), ManiaNote::tap(1, 200)];
        let (base, press) = unsmoothed(notes, 1.0);

        assert_eq!(base, vec![0.0, 1.0, 200.0, 201.0, 300.0, 301.0]);

        // 60ms at 1.3 and 80ms at 1.0 of held body between 0 and 200
        let body = 1.0 + 7.0 * 0.001 * (60.0 * 1.3 + 80.0);
        let rate = (1.0 - 24.0 / 0.08 * (0.08_f64 / 6.0).powi(2)).powf(0.25);
        let increment = rate / 0.2 * body;

        assert!(press[0].almost_eq(increment, 1e-9), "{press:?}");
        assert!(press[1].almost_eq(increment, 1e-9));
        assert!(press[2].almost_eq(0.0, 0.0));
    }

    #[test]
    fn chord_spike() {
        let seq = NoteSequence::new(
            2,
            vec![ManiaNote::tap(0, 1000), ManiaNote::tap(1, 1000)],
        );
        let grids = CornerGrids::new(&seq);
        let anchor = vec![1.0; grids.base.len()];
        let press = PressEvaluator::evaluate(&seq, &grids.base, &anchor, 0.08);

        assert!(press.iter().all(|v| v.is_finite()));
        assert!(press.iter().any(|&v| v > 0.0));
    }
}
