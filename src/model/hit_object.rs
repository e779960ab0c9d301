use std::cmp::Ordering;

/// A single osu!mania note.
///
/// Times are in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ManiaNote {
    /// Zero-based column index.
    pub column: usize,
    pub head_time: i32,
    /// Release time of a hold note, `None` for taps.
    pub tail_time: Option<i32>,
}

impl ManiaNote {
    /// Create a tap note.
    pub const fn tap(column: usize, time: i32) -> Self {
        Self {
            column,
            head_time: time,
            tail_time: None,
        }
    }

    /// Create a hold note.
    pub const fn hold(column: usize, head_time: i32, tail_time: i32) -> Self {
        Self {
            column,
            head_time,
            tail_time: Some(tail_time),
        }
    }

    /// Whether the note is a hold note.
    pub const fn is_hold_note(&self) -> bool {
        self.tail_time.is_some()
    }

    /// The end time of the note; the head time for taps.
    pub fn end_time(&self) -> i32 {
        self.tail_time.unwrap_or(self.head_time)
    }

    /// The hold duration; `0` for taps.
    pub fn duration(&self) -> i32 {
        self.end_time() - self.head_time
    }

    /// Maps a playfield x-coordinate onto a column.
    pub fn column_from_x(x: f32, key_count: usize) -> usize {
        let column = (x * key_count as f32 / 512.0).floor();

        column.clamp(0.0, key_count.saturating_sub(1) as f32) as usize
    }

    /// Shift by `offset` and convert into real time for `clock_rate`.
    ///
    /// Holds that collapse onto their head become taps.
    pub(crate) fn scaled(self, clock_rate: f64, offset: i32) -> Self {
        let scale = |time: i32| (f64::from(time + offset) / clock_rate) as i32;
        let head_time = scale(self.head_time);

        Self {
            column: self.column,
            head_time,
            tail_time: self.tail_time.map(scale).filter(|&tail| tail > head_time),
        }
    }
}

impl PartialOrd for ManiaNote {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ManiaNote {
    fn cmp(&self, other: &Self) -> Ordering {
        self.head_time
            .cmp(&other.head_time)
            .then(self.column.cmp(&other.column))
            .then(self.tail_time.cmp(&other.tail_time))
    }
}
