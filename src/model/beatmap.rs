use std::path::Path;

use rosu_map::section::{general::GameMode, hit_objects::HitObjectKind};

use crate::model::{error::BeatmapError, hit_object::ManiaNote};

/// The note data of an osu!mania beatmap.
///
/// Only constructible through [`ManiaBeatmap::new`] or a conversion so every
/// note is guaranteed to lie on the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct ManiaBeatmap {
    key_count: usize,
    od: f64,
    /// Sorted by head time, then column.
    notes: Vec<ManiaNote>,
}

impl ManiaBeatmap {
    /// Validate and sort notes.
    pub fn new(key_count: usize, od: f64, mut notes: Vec<ManiaNote>) -> Result<Self, BeatmapError> {
        if key_count == 0 {
            return Err(BeatmapError::InvalidKeyCount { key_count });
        }

        for note in notes.iter() {
            if note.column >= key_count {
                return Err(BeatmapError::InvalidColumn {
                    column: note.column,
                    key_count,
                });
            }

            if let Some(tail) = note.tail_time {
                if tail <= note.head_time {
                    return Err(BeatmapError::InvalidLongNote {
                        head: note.head_time,
                        tail,
                    });
                }
            }
        }

        notes.sort_unstable();

        Ok(Self {
            key_count,
            od,
            notes,
        })
    }

    /// Decode a `.osu` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BeatmapError> {
        let map = rosu_map::Beatmap::from_path(path)?;

        Self::try_from(&map)
    }

    /// Decode the content of a `.osu` file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BeatmapError> {
        let map = rosu_map::Beatmap::from_bytes(bytes)?;

        Self::try_from(&map)
    }

    pub const fn key_count(&self) -> usize {
        self.key_count
    }

    pub const fn od(&self) -> f64 {
        self.od
    }

    /// Notes sorted by head time, then column.
    pub fn notes(&self) -> &[ManiaNote] {
        &self.notes
    }

    pub fn n_hold_notes(&self) -> usize {
        self.notes.iter().filter(|note| note.is_hold_note()).count()
    }

    /// Latest head or tail time; `None` without notes.
    pub fn end_time(&self) -> Option<i32> {
        self.notes.iter().map(ManiaNote::end_time).max()
    }
}

impl TryFrom<&rosu_map::Beatmap> for ManiaBeatmap {
    type Error = BeatmapError;

    fn try_from(map: &rosu_map::Beatmap) -> Result<Self, Self::Error> {
        if map.mode != GameMode::Mania {
            return Err(BeatmapError::NotMania { mode: map.mode });
        }

        let key_count = f64::from(map.circle_size).round_ties_even().max(1.0) as usize;

        let notes = map
            .hit_objects
            .iter()
            .filter_map(|h| {
                let head_time = h.start_time.round() as i32;

                match h.kind {
                    HitObjectKind::Circle(ref circle) => Some(ManiaNote::tap(
                        ManiaNote::column_from_x(circle.pos.x, key_count),
                        head_time,
                    )),
                    HitObjectKind::Hold(ref hold) => {
                        let column = ManiaNote::column_from_x(hold.pos_x, key_count);
                        let tail_time = (h.start_time + hold.duration).round() as i32;

                        // Zero-length holds are played as taps
                        if tail_time > head_time {
                            Some(ManiaNote::hold(column, head_time, tail_time))
                        } else {
                            Some(ManiaNote::tap(column, head_time))
                        }
                    }
                    HitObjectKind::Slider(_) | HitObjectKind::Spinner(_) => None,
                }
            })
            .collect();

        Self::new(key_count, f64::from(map.overall_difficulty), notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_sorted() {
        let map = ManiaBeatmap::new(
            4,
            8.0,
            vec![
                ManiaNote::tap(2, 500),
                ManiaNote::hold(0, 100, 300),
                ManiaNote::tap(1, 100),
            ],
        )
        .unwrap();

        assert_eq!(map.notes()[0], ManiaNote::hold(0, 100, 300));
        assert_eq!(map.notes()[2], ManiaNote::tap(2, 500));
        assert_eq!(map.end_time(), Some(500));
        assert_eq!(map.n_hold_notes(), 1);
    }

    #[test]
    fn decoded_columns_stay_on_the_playfield() {
        let content = b"osu file format v14

[General]
Mode: 3

[Difficulty]
CircleSize:4
OverallDifficulty:8

[HitObjects]
64,192,0,1,0,0:0:0:0:
600,192,500,1,0,0:0:0:0:
448,192,1000,128,0,1500:0:0:0:0:
";

        let map = ManiaBeatmap::from_bytes(content).unwrap();

        assert_eq!(map.key_count(), 4);
        assert_eq!(
            map.notes(),
            &[
                ManiaNote::tap(0, 0),
                ManiaNote::tap(3, 500),
                ManiaNote::hold(3, 1000, 1500),
            ]
        );

        let attrs = crate::Difficulty::new().calculate(&map);

        assert_eq!(attrs.n_objects, 3);
        assert_eq!(attrs.n_hold_notes, 1);
        assert!(attrs.stars.is_finite());
    }

    #[test]
    fn rejects_invalid_notes() {
        assert!(matches!(
            ManiaBeatmap::new(4, 8.0, vec![ManiaNote::tap(4, 0)]),
            Err(BeatmapError::InvalidColumn { column: 4, key_count: 4 })
        ));

        assert!(matches!(
            ManiaBeatmap::new(4, 8.0, vec![ManiaNote::hold(0, 100, 100)]),
            Err(BeatmapError::InvalidLongNote { head: 100, tail: 100 })
        ));

        assert!(matches!(
            ManiaBeatmap::new(0, 8.0, Vec::new()),
            Err(BeatmapError::InvalidKeyCount { key_count: 0 })
        ));
    }
}
