use crate::{mania::performance::ManiaPerformance, model::hit_windows::HitWindows};

/// The result of a difficulty calculation on an osu!mania map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManiaDifficultyAttributes {
    /// The final star rating.
    pub stars: f64,
    /// Rhythmic variety of head and tail gaps.
    pub variety: f64,
    /// How strongly accuracy should be rewarded, `0.5·spikiness + 0.5·switches`.
    pub acc_scalar: f64,
    /// Relative deviation of the difficulty curve.
    pub spikiness: f64,
    /// Local rhythm changes weighted by the active hand width.
    pub switches: f64,
    /// Note count with hold notes adding weight for their length.
    pub total_notes: f64,
    /// Skill required to reach 97% accuracy.
    pub acc_skill: f64,
    /// Skill required for a full combo.
    pub fc_skill: f64,
    /// Skill per accuracy threshold, from SS down to 70%.
    pub accuracy_curve: Vec<f64>,
    /// Skill per allowed amount of misses.
    pub miss_curve: Vec<f64>,
    /// Star rating of the legacy strain model.
    pub strain_stars: f64,
    /// Hit windows in real time, i.e. after the clock rate.
    pub hit_windows: HitWindows,
    /// The amount of hitobjects.
    pub n_objects: u32,
    /// The amount of hold notes in the map.
    pub n_hold_notes: u32,
    /// The maximum achievable combo.
    pub max_combo: u32,
    pub key_count: u32,
}

impl ManiaDifficultyAttributes {
    /// Return the maximum combo.
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.n_objects
    }

    /// Returns a builder for performance calculation.
    pub fn performance<'a>(self) -> ManiaPerformance<'a> {
        ManiaPerformance::new(self)
    }
}

/// The result of a performance calculation on an osu!mania map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManiaPerformanceAttributes {
    /// The difficulty attributes that were used for the performance calculation
    pub difficulty: ManiaDifficultyAttributes,
    /// The final performance points.
    pub pp: f64,
    /// The difficulty portion of the final pp.
    pub pp_difficulty: f64,
}

impl ManiaPerformanceAttributes {
    /// Return the star value.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Return the performance point value.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    /// Return the maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.difficulty.n_objects
    }

    /// Returns a builder for performance calculation.
    pub fn performance<'a>(self) -> ManiaPerformance<'a> {
        ManiaPerformance::new(self.difficulty)
    }
}

impl From<ManiaPerformanceAttributes> for ManiaDifficultyAttributes {
    fn from(attributes: ManiaPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}
