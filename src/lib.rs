//! Difficulty and performance calculation for osu!mania.
//!
//! The star rating is built from timing "corners": every signal of a map
//! (jacks, cross-column pressure, anchors, releases, unevenness, density) is
//! evaluated at a sparse set of time points, interpolated onto a common grid,
//! and reduced into a single value. Alongside, a statistical model estimates
//! the skill a player needs to reach a given accuracy or a full combo.
//!
//! ## Usage
//!
//! ```
//! use rosu_mania_sr::{Difficulty, ManiaBeatmap, ManiaNote, ManiaPerformance};
//!
//! let notes = (0..200)
//!     .map(|i| ManiaNote::tap(i % 4, i as i32 * 120))
//!     .collect();
//!
//! let map = ManiaBeatmap::new(4, 8.0, notes).unwrap();
//!
//! // Calculate difficulty attributes
//! let diff_attrs = Difficulty::new()
//!     .mods(64) // DT
//!     .calculate(&map);
//!
//! let stars = diff_attrs.stars;
//!
//! // Calculate performance attributes
//! let perf_attrs = ManiaPerformance::new(diff_attrs)
//!     .mods(64) // DT, must be the same as for the difficulty calculation
//!     .accuracy(98.5)
//!     .misses(3)
//!     .calculate();
//!
//! assert_eq!(perf_attrs.stars(), stars);
//! assert!(perf_attrs.pp() > 0.0);
//! ```
//!
//! Maps can also be decoded from `.osu` files through [`ManiaBeatmap::from_path`]
//! or converted from a [`rosu_map::Beatmap`].
//!
//! ## Features
//!
//! | Flag      | Description         |
//! | --------- | ------------------- |
//! | `default` | No features enabled |
//! | `tracing` | Any error encountered during beatmap decoding will be logged through `tracing::error`. If this feature is not enabled, errors will be ignored.
//! | `capi`    | Exposes a C API through the `capi` module.

#![deny(rustdoc::broken_intra_doc_links, rustdoc::missing_crate_level_docs)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::similar_names,
    clippy::many_single_char_names,
    clippy::too_many_lines,
    clippy::doc_markdown
)]

#[doc(inline)]
pub use self::{
    difficulty::Difficulty,
    mania::{
        HitResultPriority, ManiaDifficultyAttributes, ManiaPerformance,
        ManiaPerformanceAttributes, ManiaScoreState, MapOrAttrs,
    },
    model::{
        beatmap::ManiaBeatmap, error::BeatmapError, hit_object::ManiaNote,
        hit_windows::HitWindows, mods::GameMods,
    },
};

/// Everything related to osu!mania.
pub mod mania;

/// Beatmap, note, and timing types.
pub mod model;

/// Numerical helpers shared across the calculation.
pub mod util;

mod difficulty;

/// C bindings.
#[cfg(feature = "capi")]
pub mod capi;

/// Re-exported [`rosu_map`].
pub use rosu_map;

/// Re-exported [`rosu_mods`].
pub use rosu_mods;
