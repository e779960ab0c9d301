use std::{borrow::Cow, cmp};

use self::{
    calculator::ManiaPerformanceCalculator,
    hitresult_generator::{generate_hitresults, ManiaHitResultParams},
};

use crate::{
    difficulty::Difficulty,
    mania::{
        attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
        score_state::ManiaScoreState,
    },
    model::{beatmap::ManiaBeatmap, mods::GameMods},
};

mod calculator;
pub mod hitresult_generator;

/// While generating remaining hitresults, decide how they should be distributed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HitResultPriority {
    /// Prioritize good hitresults over bad ones
    #[default]
    BestCase,
    /// Prioritize bad hitresults over good ones
    WorstCase,
}

/// Either a beatmap or previously calculated attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum MapOrAttrs<'map> {
    Map(Cow<'map, ManiaBeatmap>),
    Attrs(ManiaDifficultyAttributes),
}

impl<'map> From<&'map ManiaBeatmap> for MapOrAttrs<'map> {
    fn from(map: &'map ManiaBeatmap) -> Self {
        Self::Map(Cow::Borrowed(map))
    }
}

impl From<ManiaBeatmap> for MapOrAttrs<'_> {
    fn from(map: ManiaBeatmap) -> Self {
        Self::Map(Cow::Owned(map))
    }
}

impl From<ManiaDifficultyAttributes> for MapOrAttrs<'_> {
    fn from(attrs: ManiaDifficultyAttributes) -> Self {
        Self::Attrs(attrs)
    }
}

impl From<ManiaPerformanceAttributes> for MapOrAttrs<'_> {
    fn from(attrs: ManiaPerformanceAttributes) -> Self {
        Self::Attrs(attrs.difficulty)
    }
}

/// Performance calculator on osu!mania maps.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct ManiaPerformance<'map> {
    map_or_attrs: MapOrAttrs<'map>,
    difficulty: Difficulty,
    n320: Option<u32>,
    n300: Option<u32>,
    n200: Option<u32>,
    n100: Option<u32>,
    n50: Option<u32>,
    misses: Option<u32>,
    acc: Option<f64>,
    hitresult_priority: HitResultPriority,
}

impl<'map> ManiaPerformance<'map> {
    /// Create a new performance calculator for osu!mania maps.
    ///
    /// The argument `map_or_attrs` must be either
    /// - previously calculated attributes ([`ManiaDifficultyAttributes`]
    ///   or [`ManiaPerformanceAttributes`])
    /// - a [`ManiaBeatmap`] (by reference or value)
    ///
    /// If a map is given, difficulty attributes will need to be calculated
    /// internally which is a costly operation. Hence, passing attributes
    /// should be prefered.
    ///
    /// However, when passing previously calculated attributes, make sure they
    /// have been calculated for the same map and [`Difficulty`] settings.
    /// Otherwise, the final attributes will be incorrect.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            n320: None,
            n300: None,
            n200: None,
            n100: None,
            n50: None,
            misses: None,
            acc: None,
            hitresult_priority: HitResultPriority::default(),
        }
    }

    /// Specify mods.
    ///
    /// Accepted types are
    /// - `u32`
    /// - [`rosu_mods::GameModsLegacy`]
    ///
    /// See <https://github.com/ppy/osu-api/wiki#mods>
    pub fn mods(mut self, mods: impl Into<GameMods>) -> Self {
        self.difficulty = self.difficulty.mods(mods);

        self
    }

    /// Use the specified settings of the given [`Difficulty`].
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.difficulty = self.difficulty.passed_objects(passed_objects);

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
        self.difficulty = self.difficulty.clock_rate(clock_rate);

        self
    }

    /// Override a beatmap's set OD.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0       | 10      |
    pub fn od(mut self, od: f64) -> Self {
        self.difficulty = self.difficulty.od(od);

        self
    }

    /// Whether the calculated attributes belong to an osu!lazer or osu!stable
    /// score.
    ///
    /// Defaults to `true`.
    ///
    /// On stable, 320s and 300s are worth the same when generating hitresults
    /// for a given accuracy.
    pub fn lazer(mut self, lazer: bool) -> Self {
        self.difficulty = self.difficulty.lazer(lazer);

        self
    }

    /// Specify the amount of 320s of a play.
    pub const fn n320(mut self, n320: u32) -> Self {
        self.n320 = Some(n320);

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 200s of a play.
    pub const fn n200(mut self, n200: u32) -> Self {
        self.n200 = Some(n200);

        self
    }

    /// Specify the amount of 100s of a play.
    pub const fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of 50s of a play.
    pub const fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Specify the priority of hitresults.
    ///
    /// `HitResultPriority::BestCase` fills missing hitresults with the
    /// judgements closest to the target accuracy.
    /// `HitResultPriority::WorstCase` uses the most extreme ones.
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Provide parameters through a [`ManiaScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: ManiaScoreState) -> Self {
        let ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses,
        } = state;

        self.n320 = Some(n320);
        self.n300 = Some(n300);
        self.n200 = Some(n200);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        self
    }

    /// Create the [`ManiaScoreState`] that will be used for performance calculation.
    pub fn generate_state(&mut self) -> ManiaScoreState {
        let n_objects = match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = self.difficulty.calculate(map);
                let n_objects = attrs.n_objects;
                self.map_or_attrs = MapOrAttrs::Attrs(attrs);

                n_objects
            }
            MapOrAttrs::Attrs(ref attrs) => attrs.n_objects,
        };

        let total_hits = cmp::min(self.difficulty.get_passed_objects() as u32, n_objects);

        let params = ManiaHitResultParams {
            total_hits,
            classic: !self.difficulty.get_lazer(),
            priority: self.hitresult_priority,
            acc: self.acc,
            n320: self.n320,
            n300: self.n300,
            n200: self.n200,
            n100: self.n100,
            n50: self.n50,
            misses: self.misses.unwrap_or(0),
        };

        let state = generate_hitresults(&params);

        self.n320 = Some(state.n320);
        self.n300 = Some(state.n300);
        self.n200 = Some(state.n200);
        self.n100 = Some(state.n100);
        self.n50 = Some(state.n50);
        self.misses = Some(state.misses);

        state
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> ManiaPerformanceAttributes {
        let state = self.generate_state();

        let attrs = match self.map_or_attrs {
            MapOrAttrs::Attrs(attrs) => attrs,
            MapOrAttrs::Map(ref map) => self.difficulty.calculate(map),
        };

        log::debug!(
            "mania performance: stars={} acc={}",
            attrs.stars,
            state.accuracy(false)
        );

        ManiaPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state).calculate()
    }
}
