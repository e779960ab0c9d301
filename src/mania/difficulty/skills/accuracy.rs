use crate::{
    mania::difficulty::skills::simulator::AccuracySimulator, model::hit_windows::HitWindows,
};

/// Skill values a player needs for a range of accuracies and miss counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccuracySkillValues {
    /// Skill for 97% accuracy.
    pub acc_skill: f64,
    /// Skill for a full combo.
    pub fc_skill: f64,
    /// Skill per entry of [`ManiaAccuracySkill::ACCURACY_THRESHOLDS`].
    ///
    /// The SS entry is at least the 99.5% entry.
    pub accuracy_curve: Vec<f64>,
    /// Skill per entry of [`ManiaAccuracySkill::MISS_COUNTS`].
    pub miss_curve: Vec<f64>,
}

/// Collects per-note difficulties and inverts the statistical play model
/// on them.
#[derive(Clone, Debug, PartialEq)]
pub struct ManiaAccuracySkill {
    heads: Vec<f64>,
    tails: Vec<f64>,
    windows: HitWindows,
    is_classic: bool,
}

impl ManiaAccuracySkill {
    /// Probability with which the found skill reaches its goal.
    pub const TARGET_PROBABILITY: f64 = 0.02;
    pub const STAR_ACCURACY: f64 = 0.97;

    pub const ACCURACY_THRESHOLDS: [f64; 20] = [
        1.0, 0.995, 0.99, 0.985, 0.98, 0.975, 0.97, 0.965, 0.96, 0.95, 0.94, 0.93, 0.92, 0.91,
        0.90, 0.875, 0.85, 0.80, 0.75, 0.70,
    ];
    pub const MISS_COUNTS: [u32; 8] = [0, 1, 2, 3, 5, 10, 20, 50];

    const ACCURACY_BIN_THRESHOLD: usize = 128;
    const ACCURACY_BIN_COUNT: usize = 64;
    const MISS_BIN_THRESHOLD: usize = 64;
    const MISS_BIN_COUNT: usize = 32;

    /// `windows` must already account for the clock rate.
    pub const fn new(windows: HitWindows, is_classic: bool) -> Self {
        Self {
            heads: Vec::new(),
            tails: Vec::new(),
            windows,
            is_classic,
        }
    }

    pub fn process(&mut self, difficulty: f64, is_tail: bool) {
        if is_tail {
            self.tails.push(difficulty);
        } else {
            self.heads.push(difficulty);
        }
    }

    pub fn n_processed(&self) -> usize {
        self.heads.len() + self.tails.len()
    }

    fn accuracy_simulator(&self) -> AccuracySimulator {
        AccuracySimulator::new(
            &self.heads,
            &self.tails,
            self.windows,
            self.is_classic,
            Self::ACCURACY_BIN_THRESHOLD,
            Self::ACCURACY_BIN_COUNT,
        )
    }

    fn miss_simulator(&self) -> AccuracySimulator {
        AccuracySimulator::new(
            &self.heads,
            &self.tails,
            self.windows,
            self.is_classic,
            Self::MISS_BIN_THRESHOLD,
            Self::MISS_BIN_COUNT,
        )
    }

    /// Skill for [`Self::STAR_ACCURACY`].
    pub fn difficulty_value(&self) -> f64 {
        if self.n_processed() == 0 {
            return 0.0;
        }

        self.accuracy_simulator()
            .skill_for_accuracy(Self::STAR_ACCURACY, Self::TARGET_PROBABILITY)
    }

    pub fn evaluate(&self) -> AccuracySkillValues {
        if self.n_processed() == 0 {
            return AccuracySkillValues {
                accuracy_curve: vec![0.0; Self::ACCURACY_THRESHOLDS.len()],
                miss_curve: vec![0.0; Self::MISS_COUNTS.len()],
                ..Default::default()
            };
        }

        let accuracy = self.accuracy_simulator();
        let misses = self.miss_simulator();

        let mut accuracy_curve: Vec<f64> = Self::ACCURACY_THRESHOLDS
            .iter()
            .map(|&acc| accuracy.skill_for_accuracy(acc, Self::TARGET_PROBABILITY))
            .collect();

        // The normal approximation for 99.5% may exceed the exact SS product on tiny maps
        accuracy_curve[0] = accuracy_curve[0].max(accuracy_curve[1]);

        let miss_curve: Vec<f64> = Self::MISS_COUNTS
            .iter()
            .map(|&count| misses.skill_for_misses(count, Self::TARGET_PROBABILITY))
            .collect();

        let acc_skill = Self::ACCURACY_THRESHOLDS
            .iter()
            .position(|&acc| acc == Self::STAR_ACCURACY)
            .map_or_else(
                || accuracy.skill_for_accuracy(Self::STAR_ACCURACY, Self::TARGET_PROBABILITY),
                |idx| accuracy_curve[idx],
            );

        log::debug!(
            "accuracy skill over {} notes: acc={acc_skill} fc={}",
            accuracy.n_notes(),
            miss_curve[0]
        );

        AccuracySkillValues {
            acc_skill,
            fc_skill: miss_curve[0],
            accuracy_curve,
            miss_curve,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::mods::GameMods, util::float_ext::FloatExt};

    use super::*;

    fn skill(difficulties: &[f64]) -> ManiaAccuracySkill {
        let windows = HitWindows::new(8.0, GameMods::default(), false);
        let mut skill = ManiaAccuracySkill::new(windows, false);

        for (i, &difficulty) in difficulties.iter().enumerate() {
            skill.process(difficulty, i % 5 == 4);
        }

        skill
    }

    #[test]
    fn no_notes() {
        let values = skill(&[]).evaluate();

        assert!(values.acc_skill.almost_eq(0.0, 0.0));
        assert_eq!(values.accuracy_curve, vec![0.0; 20]);
        assert_eq!(values.miss_curve, vec![0.0; 8]);
    }

    #[test]
    fn curves_are_monotone() {
        let difficulties: Vec<_> = (0..200).map(|i| 4.0 + f64::from(i % 7) * 0.3).collect();
        let values = skill(&difficulties).evaluate();

        assert!(values
            .accuracy_curve
            .windows(2)
            .all(|pair| pair[0] >= pair[1] - 1e-6));
        assert!(values.miss_curve.windows(2).all(|pair| pair[0] >= pair[1] - 1e-6));
        assert!(values.acc_skill.almost_eq(values.accuracy_curve[6], 0.0));
        assert!(values.fc_skill.almost_eq(values.miss_curve[0], 0.0));
    }

    #[test]
    fn difficulty_value_matches_curve() {
        let difficulties: Vec<_> = (0..50).map(|i| 3.0 + f64::from(i % 3)).collect();
        let skill = skill(&difficulties);

        assert!(skill
            .difficulty_value()
            .almost_eq(skill.evaluate().acc_skill, 1e-12));
    }

    #[test]
    fn ss_is_never_easier_on_tiny_maps() {
        let windows = HitWindows::new(8.0, GameMods::from(16), true);
        let mut skill = ManiaAccuracySkill::new(windows, true);
        skill.process(2.0, false);
        skill.process(2.5, false);
        skill.process(2.5, true);

        let curve = skill.evaluate().accuracy_curve;

        assert!(curve[0] > 0.0);
        assert!(curve[0] >= curve[1], "{curve:?}");
    }

    #[test]
    fn harder_notes_need_more_skill() {
        let easy = skill(&[3.0; 40]).difficulty_value();
        let hard = skill(&[6.0; 40]).difficulty_value();

        assert!(hard > easy);
    }
}
