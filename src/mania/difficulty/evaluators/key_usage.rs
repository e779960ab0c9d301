use crate::{
    mania::difficulty::{corners::GridCursor, sequence::NoteSequence},
    model::hit_object::ManiaNote,
};

/// Which columns are in use around each corner.
pub struct KeyUsage {
    /// `active[k][i]`: column `k` has a note within 150ms of corner `i`.
    pub active: Vec<Vec<bool>>,
    /// Active columns per corner, ascending.
    pub active_columns: Vec<Vec<usize>>,
    /// Number of active columns per corner, at least 1.
    pub key_counts: Vec<f64>,
    /// Per-column usage with a 400ms quadratic falloff.
    pub usage_400: Vec<Vec<f64>>,
}

impl KeyUsage {
    const ACTIVE_RADIUS: f64 = 150.0;
    const FALLOFF_RADIUS: f64 = 400.0;
    const BASE_USAGE: f64 = 3.75;

    pub fn new(seq: &NoteSequence, base: &[f64]) -> Self {
        let active: Vec<_> = seq
            .by_column
            .iter()
            .map(|column| Self::column_activity(column, base, seq.end))
            .collect();

        let active_columns: Vec<Vec<usize>> = (0..base.len())
            .map(|i| (0..seq.key_count).filter(|&k| active[k][i]).collect())
            .collect();

        let key_counts = active_columns
            .iter()
            .map(|columns| columns.len().max(1) as f64)
            .collect();

        let usage_400 = seq
            .by_column
            .iter()
            .map(|column| Self::column_usage_400(column, base, seq.end))
            .collect();

        Self {
            active,
            active_columns,
            key_counts,
            usage_400,
        }
    }

    pub fn is_active(&self, column: usize, idx: usize) -> bool {
        self.active[column][idx]
    }

    fn column_activity(column: &[ManiaNote], base: &[f64], end: f64) -> Vec<bool> {
        let mut active = vec![false; base.len()];
        let mut cursor = GridCursor::new(base);

        for note in column {
            let head = f64::from(note.head_time);
            let start = (head - Self::ACTIVE_RADIUS).max(0.0);

            let release = match note.tail_time {
                Some(tail) => (f64::from(tail) + Self::ACTIVE_RADIUS).min(end - 1.0),
                None => head + Self::ACTIVE_RADIUS,
            };

            let left = cursor.seek(start);
            let right = cursor.peek(release);

            active[left..right].fill(true);
        }

        active
    }

    fn column_usage_400(column: &[ManiaNote], base: &[f64], end: f64) -> Vec<f64> {
        let mut usage = vec![0.0; base.len()];
        let mut before_cursor = GridCursor::new(base);
        let mut body_cursor = GridCursor::new(base);

        let falloff = |distance: f64| {
            Self::BASE_USAGE - Self::BASE_USAGE / Self::FALLOFF_RADIUS.powi(2) * distance.powi(2)
        };

        for note in column {
            let start = f64::from(note.head_time);

            let release = match note.tail_time {
                Some(tail) => f64::from(tail).min(end - 1.0),
                None => start,
            };

            let left_400 = before_cursor.seek(start - Self::FALLOFF_RADIUS);
            let left = body_cursor.seek(start);
            let right = body_cursor.peek(release);
            let right_400 = body_cursor.peek(release + Self::FALLOFF_RADIUS);

            let body = Self::BASE_USAGE + (release - start).min(1500.0) / 150.0;

            for value in usage[left..right].iter_mut() {
                *value += body;
            }

            for (value, &corner) in usage[left_400..left].iter_mut().zip(&base[left_400..left]) {
                *value += falloff(corner - start);
            }

            for (value, &corner) in usage[right..right_400]
                .iter_mut()
                .zip(&base[right..right_400])
            {
                *value += falloff(corner - release);
            }
        }

        usage
    }
}

/// Number of notes within 500ms of each corner.
///
/// Tails count as notes too if `with_tails` is set.
pub fn note_density(seq: &NoteSequence, grid: &[f64], with_tails: bool) -> Vec<f64> {
    const RADIUS: f64 = 500.0;

    let mut times: Vec<f64> = seq
        .notes
        .iter()
        .map(|note| f64::from(note.head_time))
        .collect();

    if with_tails {
        times.extend(seq.tails.iter().map(|note| f64::from(note.end_time())));
        times.sort_unstable_by(f64::total_cmp);
    }

    let mut lower = 0;
    let mut upper = 0;

    grid.iter()
        .map(|&corner| {
            while lower < times.len() && times[lower] < corner - RADIUS {
                lower += 1;
            }

            while upper < times.len() && times[upper] < corner + RADIUS {
                upper += 1;
            }

            (upper - lower) as f64
        })
        .collect()
}
