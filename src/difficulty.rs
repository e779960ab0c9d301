use crate::{
    mania::{difficulty, ManiaDifficultyAttributes},
    model::{beatmap::ManiaBeatmap, mods::GameMods},
};

/// Difficulty calculator on osu!mania maps.
///
/// # Example
///
/// ```
/// use rosu_mania_sr::{Difficulty, ManiaBeatmap, ManiaNote};
///
/// let notes = vec![
///     ManiaNote::tap(0, 0),
///     ManiaNote::tap(1, 150),
///     ManiaNote::hold(2, 300, 800),
/// ];
///
/// let map = ManiaBeatmap::new(4, 8.0, notes).unwrap();
///
/// let attrs = Difficulty::new()
///     .mods(64) // DT
///     .calculate(&map);
///
/// assert!(attrs.stars > 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    passed_objects: Option<u32>,
    clock_rate: Option<f64>,
    od: Option<f64>,
    lazer: Option<bool>,
}

impl Difficulty {
    /// Create a new difficulty calculator.
    pub const fn new() -> Self {
        Self {
            mods: GameMods::new(),
            passed_objects: None,
            clock_rate: None,
            od: None,
            lazer: None,
        }
    }

    /// Specify mods.
    ///
    /// Accepted types are
    /// - `u32`
    /// - [`rosu_mods::GameModsLegacy`]
    ///
    /// See <https://github.com/ppy/osu-api/wiki#mods>
    pub fn mods(self, mods: impl Into<GameMods>) -> Self {
        Self {
            mods: mods.into(),
            ..self
        }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub const fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0.01    | 100     |
    pub fn clock_rate(mut self, clock_rate: f64) -> Self {
        self.clock_rate = Some(clock_rate.clamp(0.01, 100.0));

        self
    }

    /// Override a beatmap's set OD.
    ///
    /// The value is used before applying mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0       | 10      |
    pub fn od(mut self, od: f64) -> Self {
        self.od = Some(od.clamp(0.0, 10.0));

        self
    }

    /// Whether the calculated attributes belong to an osu!lazer or osu!stable
    /// score.
    ///
    /// Defaults to `true`.
    ///
    /// This affects the hit windows, the judgement values, and whether hold
    /// note tails count towards note density.
    pub const fn lazer(mut self, lazer: bool) -> Self {
        self.lazer = Some(lazer);

        self
    }

    /// Perform the difficulty calculation.
    pub fn calculate(&self, map: &ManiaBeatmap) -> ManiaDifficultyAttributes {
        difficulty::difficulty(self, map)
    }

    pub const fn get_mods(&self) -> GameMods {
        self.mods
    }

    pub fn get_clock_rate(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.clock_rate())
    }

    pub fn get_passed_objects(&self) -> usize {
        self.passed_objects.map_or(usize::MAX, |n| n as usize)
    }

    pub const fn get_od(&self) -> Option<f64> {
        self.od
    }

    pub fn get_lazer(&self) -> bool {
        self.lazer.unwrap_or(true)
    }
}
