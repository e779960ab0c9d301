use crate::{model::hit_windows::HitWindows, util::difficulty::hit_probability};

/// Unstable rate of a player that is completely lost.
pub const MASH_UR: f64 = 1000.0;
/// Unstable rate of a player whose skill matches the note difficulty.
pub const SKILL_UR: f64 = 120.0;
const UR_EXPONENT: f64 = 1.5;

const TAIL_WINDOW_MULTIPLIER: f64 = 1.5;
const TAIL_UR_MULTIPLIER: f64 = 1.8;

/// Expected unstable rate of `skill` on a note of `difficulty`.
pub fn unstable_rate(skill: f64, difficulty: f64) -> f64 {
    if difficulty <= 0.0 {
        return 0.0;
    }

    MASH_UR * (SKILL_UR / MASH_UR).powf((skill / difficulty).powf(UR_EXPONENT))
}

/// Judgement distribution of a single note.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JudgementProbabilities {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub ok: f64,
    pub meh: f64,
    pub miss: f64,
    /// Expected judgement value, normalized to `0..=1`.
    pub score: f64,
    /// Variance of the normalized judgement value.
    pub variance: f64,
}

impl JudgementProbabilities {
    const LAZER_VALUES: [f64; 6] = [320.0, 300.0, 200.0, 100.0, 50.0, 0.0];
    const CLASSIC_VALUES: [f64; 6] = [300.0, 300.0, 200.0, 100.0, 50.0, 0.0];

    /// Judgements of a hit error that is normally distributed with the
    /// given deviation in ms.
    pub fn new(windows: &HitWindows, deviation: f64, is_classic: bool) -> Self {
        let [perfect, great, good, ok, meh] =
            windows.as_array().map(|window| hit_probability(window, deviation));

        let probabilities = [
            perfect,
            (great - perfect).max(0.0),
            (good - great).max(0.0),
            (ok - good).max(0.0),
            (meh - ok).max(0.0),
            (1.0 - meh).max(0.0),
        ];

        let values = if is_classic {
            Self::CLASSIC_VALUES
        } else {
            Self::LAZER_VALUES
        };

        let max_value = values[0];
        let mut score = 0.0;
        let mut square = 0.0;

        for (p, value) in probabilities.iter().zip(values) {
            let value = value / max_value;
            score += p * value;
            square += p * value * value;
        }

        Self {
            perfect: probabilities[0],
            great: probabilities[1],
            good: probabilities[2],
            ok: probabilities[3],
            meh: probabilities[4],
            miss: probabilities[5],
            score,
            variance: (square - score * score).max(0.0),
        }
    }

    /// Judgements of a note or long note tail of the given difficulty.
    pub fn for_note(
        windows: &HitWindows,
        skill: f64,
        difficulty: f64,
        is_tail: bool,
        is_classic: bool,
    ) -> Self {
        let ur = unstable_rate(skill, difficulty);

        if is_tail {
            let windows = windows.scale(TAIL_WINDOW_MULTIPLIER);

            Self::new(&windows, ur * TAIL_UR_MULTIPLIER / 10.0, is_classic)
        } else {
            Self::new(windows, ur / 10.0, is_classic)
        }
    }

    /// Probability of the best possible judgement value.
    pub fn max_value(&self, is_classic: bool) -> f64 {
        if is_classic {
            self.perfect + self.great
        } else {
            self.perfect
        }
    }
}
