use crate::model::hit_object::ManiaNote;

/// The note streams every corner evaluator reads from.
pub struct NoteSequence {
    pub key_count: usize,
    /// All notes sorted by head time, then column.
    pub notes: Vec<ManiaNote>,
    /// Notes of each column, sorted by head time.
    pub by_column: Vec<Vec<ManiaNote>>,
    /// Hold notes sorted by head time.
    pub long_notes: Vec<ManiaNote>,
    /// Hold notes sorted by tail time.
    pub tails: Vec<ManiaNote>,
    /// One past the latest head or tail time.
    pub end: f64,
}

impl NoteSequence {
    /// `notes` must be non-empty and sorted.
    pub fn new(key_count: usize, notes: Vec<ManiaNote>) -> Self {
        let mut by_column = vec![Vec::new(); key_count];

        for note in notes.iter() {
            by_column[note.column].push(*note);
        }

        let long_notes: Vec<_> = notes
            .iter()
            .copied()
            .filter(ManiaNote::is_hold_note)
            .collect();

        let mut tails = long_notes.clone();
        tails.sort_by_key(ManiaNote::end_time);

        let end = notes.iter().map(ManiaNote::end_time).max().unwrap_or(0);

        Self {
            key_count,
            notes,
            by_column,
            long_notes,
            tails,
            end: f64::from(end) + 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Head time of the note that follows `note` in its column.
    pub fn next_head_in_column(&self, note: &ManiaNote) -> Option<i32> {
        let column = &self.by_column[note.column];
        let idx = column.partition_point(|other| other.head_time <= note.head_time);

        column.get(idx).map(|next| next.head_time)
    }

    /// `(start, gap)` between consecutive distinct head times.
    pub fn head_gaps(&self) -> Vec<(i32, i32)> {
        distinct_gaps(self.notes.iter().map(|note| note.head_time))
    }

    /// `(start, gap)` between consecutive distinct tail times.
    pub fn tail_gaps(&self) -> Vec<(i32, i32)> {
        distinct_gaps(self.tails.iter().map(ManiaNote::end_time))
    }

    /// Notes plus half a note per 200ms of held body, capped at 1s per hold.
    pub fn total_notes(&self) -> f64 {
        let body: f64 = self
            .long_notes
            .iter()
            .map(|note| f64::from(note.duration().min(1000)) / 200.0)
            .sum();

        self.notes.len() as f64 + 0.5 * body
    }
}

fn distinct_gaps(sorted_times: impl Iterator<Item = i32>) -> Vec<(i32, i32)> {
    let mut times: Vec<i32> = sorted_times.collect();
    times.dedup();

    times
        .windows(2)
        .map(|pair| (pair[0], pair[1] - pair[0]))
        .collect()
}
