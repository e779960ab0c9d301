use std::{error::Error as StdError, fmt, io};

use rosu_map::section::general::GameMode;

/// Error when building a [`ManiaBeatmap`].
///
/// [`ManiaBeatmap`]: crate::model::beatmap::ManiaBeatmap
#[derive(Debug)]
pub enum BeatmapError {
    /// Failed to read or decode the `.osu` file.
    Io(io::Error),
    /// The beatmap is not an osu!mania beatmap.
    NotMania { mode: GameMode },
    /// Key counts must be positive.
    InvalidKeyCount { key_count: usize },
    /// A note lies outside of the playfield.
    InvalidColumn { column: usize, key_count: usize },
    /// A hold note does not end after it starts.
    InvalidLongNote { head: i32, tail: i32 },
}

impl fmt::Display for BeatmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(_) => f.write_str("failed to decode beatmap"),
            Self::NotMania { mode } => write!(f, "cannot calculate mania difficulty of {mode:?} map"),
            Self::InvalidKeyCount { key_count } => write!(f, "invalid key count {key_count}"),
            Self::InvalidColumn { column, key_count } => {
                write!(f, "column {column} is out of range for {key_count} keys")
            }
            Self::InvalidLongNote { head, tail } => {
                write!(f, "hold note at {head}ms must end after it starts, got {tail}ms")
            }
        }
    }
}

impl StdError for BeatmapError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::NotMania { .. }
            | Self::InvalidKeyCount { .. }
            | Self::InvalidColumn { .. }
            | Self::InvalidLongNote { .. } => None,
        }
    }
}

impl From<io::Error> for BeatmapError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
