use crate::mania::difficulty::sequence::NoteSequence;

/// The time points at which the pressure signals are evaluated.
pub struct CornerGrids {
    /// Dense grid around every note, used by most evaluators.
    pub base: Vec<f64>,
    /// Coarser grid for the unevenness signal.
    pub a: Vec<f64>,
    /// Union of `base` and `a`, the domain of the final curve.
    pub all: Vec<f64>,
}

impl CornerGrids {
    const BASE_OFFSETS: [i64; 4] = [0, 1, 501, -499];
    const A_OFFSETS: [i64; 3] = [0, 1000, -1000];

    pub fn new(seq: &NoteSequence) -> Self {
        let times: Vec<i64> = seq
            .notes
            .iter()
            .flat_map(|note| {
                let head = i64::from(note.head_time);

                [Some(head), note.tail_time.map(i64::from)]
            })
            .flatten()
            .collect();

        let end = seq.end as i64;
        let base = build_grid(&times, &Self::BASE_OFFSETS, end);
        let a = build_grid(&times, &Self::A_OFFSETS, end);
        let all = merge(&base, &a);

        log::debug!(
            "corner grids: base={} a={} all={}",
            base.len(),
            a.len(),
            all.len()
        );

        Self { base, a, all }
    }
}

fn build_grid(times: &[i64], offsets: &[i64], end: i64) -> Vec<f64> {
    let mut corners = Vec::with_capacity(times.len() * offsets.len() + 2);
    corners.push(0);
    corners.push(end);

    for &time in times {
        corners.extend(offsets.iter().map(|offset| time + offset));
    }

    corners.retain(|&corner| (0..=end).contains(&corner));
    corners.sort_unstable();
    corners.dedup();

    corners.into_iter().map(|corner| corner as f64).collect()
}

fn merge(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            merged.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            merged.push(b[j]);
            j += 1;
        } else {
            merged.push(a[i]);
            i += 1;
            j += 1;
        }
    }

    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);

    merged
}

/// Forward-only lower-bound search over a sorted grid.
///
/// Queries must be non-decreasing.
pub struct GridCursor<'a> {
    grid: &'a [f64],
    idx: usize,
}

impl<'a> GridCursor<'a> {
    pub const fn new(grid: &'a [f64]) -> Self {
        Self { grid, idx: 0 }
    }

    /// Index of the first corner `>= time`.
    pub fn seek(&mut self, time: f64) -> usize {
        debug_assert!(self.idx == 0 || self.grid[self.idx - 1] < time);

        while self.idx < self.grid.len() && self.grid[self.idx] < time {
            self.idx += 1;
        }

        self.idx
    }

    /// Index of the first corner `>= time`, searching from the current
    /// position without advancing.
    pub fn peek(&self, time: f64) -> usize {
        self.idx + self.grid[self.idx..].partition_point(|&corner| corner < time)
    }
}
