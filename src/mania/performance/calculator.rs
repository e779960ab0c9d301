use crate::{
    mania::{
        attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
        score_state::ManiaScoreState,
    },
    model::mods::GameMods,
};

pub(super) struct ManiaPerformanceCalculator {
    attrs: ManiaDifficultyAttributes,
    mods: GameMods,
    state: ManiaScoreState,
}

impl ManiaPerformanceCalculator {
    pub const fn new(attrs: ManiaDifficultyAttributes, mods: GameMods, state: ManiaScoreState) -> Self {
        Self { attrs, mods, state }
    }
}

impl ManiaPerformanceCalculator {
    pub fn calculate(self) -> ManiaPerformanceAttributes {
        let mut multiplier = 1.0;

        if self.mods.nf() {
            multiplier *= 0.75;
        }

        if self.mods.ez() {
            multiplier *= 0.5;
        }

        let pp_difficulty = self.compute_difficulty_value();
        let pp = pp_difficulty * multiplier;

        ManiaPerformanceAttributes {
            difficulty: self.attrs,
            pp,
            pp_difficulty,
        }
    }

    fn compute_difficulty_value(&self) -> f64 {
        let total_hits = f64::from(self.state.total_hits());

        // * Star rating to pp curve
        let difficulty_value = 8.0 * (self.attrs.stars - 0.15).max(0.05).powf(2.2);

        // * From 80% accuracy, 1/20th of total pp is awarded per additional 1% accuracy
        let acc_factor = (5.0 * self.state.accuracy(false) - 4.0).max(0.0);

        // * Length bonus, capped at 1500 notes
        let length_bonus = 1.0 + 0.1 * (total_hits / 1500.0).min(1.0);

        difficulty_value * acc_factor * length_bonus
    }
}
