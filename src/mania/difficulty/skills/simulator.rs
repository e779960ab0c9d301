use crate::{
    mania::difficulty::skills::judgements::JudgementProbabilities,
    model::hit_windows::HitWindows,
    util::{
        bin::Bin,
        difficulty::normal_cdf,
        float_ext::FloatExt,
        poisson_binomial::PoissonBinomial,
        root_finding::RootFinding,
    },
};

#[derive(Copy, Clone, Debug, PartialEq)]
struct Entry {
    difficulty: f64,
    count: f64,
    is_tail: bool,
}

impl Entry {
    const fn new(difficulty: f64, count: f64, is_tail: bool) -> Self {
        Self {
            difficulty,
            count,
            is_tail,
        }
    }
}

/// Statistical model of a play through a map.
///
/// Maps a skill value onto the probability of reaching an accuracy or of
/// staying below a miss count, and inverts that relation.
///
/// Binning only affects the normal approximations. Products over every note,
/// i.e. SS and full combo, always use the unbinned difficulties.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracySimulator {
    /// Possibly binned entries for the normal approximations.
    entries: Vec<Entry>,
    /// One entry per note.
    notes: Vec<Entry>,
    windows: HitWindows,
    is_classic: bool,
    n_notes: f64,
    max_difficulty: f64,
}

impl AccuracySimulator {
    const ROOT_ACCURACY: f64 = 1e-7;

    /// Exact for up to `threshold` notes, otherwise heads and tails are
    /// quantized into `bin_count` bins each.
    pub fn new(
        heads: &[f64],
        tails: &[f64],
        windows: HitWindows,
        is_classic: bool,
        threshold: usize,
        bin_count: usize,
    ) -> Self {
        if heads.len() + tails.len() <= threshold {
            Self::exact(heads, tails, windows, is_classic)
        } else {
            Self::binned(heads, tails, windows, is_classic, bin_count)
        }
    }

    pub fn exact(heads: &[f64], tails: &[f64], windows: HitWindows, is_classic: bool) -> Self {
        let notes = Self::notes(heads, tails);

        Self::from_entries(notes.clone(), notes, windows, is_classic)
    }

    pub fn binned(
        heads: &[f64],
        tails: &[f64],
        windows: HitWindows,
        is_classic: bool,
        bin_count: usize,
    ) -> Self {
        let head_bins = Bin::create_bins_1d(heads, bin_count);
        let tail_bins = Bin::create_bins_1d(tails, bin_count);

        let entries = head_bins
            .iter()
            .map(|bin| Entry::new(bin.value(), bin.count, false))
            .chain(tail_bins.iter().map(|bin| Entry::new(bin.value(), bin.count, true)))
            .collect();

        Self::from_entries(entries, Self::notes(heads, tails), windows, is_classic)
    }

    fn notes(heads: &[f64], tails: &[f64]) -> Vec<Entry> {
        heads
            .iter()
            .map(|&difficulty| Entry::new(difficulty, 1.0, false))
            .chain(tails.iter().map(|&difficulty| Entry::new(difficulty, 1.0, true)))
            .collect()
    }

    fn from_entries(
        entries: Vec<Entry>,
        notes: Vec<Entry>,
        windows: HitWindows,
        is_classic: bool,
    ) -> Self {
        let n_notes = notes.len() as f64;

        // Bin means lie below the hardest note so the bracket would shrink
        let max_difficulty = notes
            .iter()
            .map(|entry| entry.difficulty)
            .fold(0.0, f64::max);

        Self {
            entries,
            notes,
            windows,
            is_classic,
            n_notes,
            max_difficulty,
        }
    }

    /// Amount of judged notes, tails included.
    pub const fn n_notes(&self) -> f64 {
        self.n_notes
    }

    fn judgements(&self, skill: f64) -> impl Iterator<Item = (JudgementProbabilities, f64)> + '_ {
        self.judge(&self.entries, skill)
    }

    fn judge<'a>(
        &'a self,
        entries: &'a [Entry],
        skill: f64,
    ) -> impl Iterator<Item = (JudgementProbabilities, f64)> + 'a {
        entries.iter().map(move |entry| {
            let probabilities = JudgementProbabilities::for_note(
                &self.windows,
                skill,
                entry.difficulty,
                entry.is_tail,
                self.is_classic,
            );

            (probabilities, entry.count)
        })
    }

    /// Probability that every note satisfies `hit`.
    fn product(&self, skill: f64, hit: impl Fn(&JudgementProbabilities) -> f64) -> f64 {
        let mut log_sum = 0.0;

        for (probabilities, _) in self.judge(&self.notes, skill) {
            let p = hit(&probabilities);

            if p <= 0.0 {
                return 0.0;
            }

            log_sum += p.ln();
        }

        log_sum.exp()
    }

    /// Probability that a player of `skill` reaches at least `accuracy`.
    pub fn accuracy_probability(&self, skill: f64, accuracy: f64) -> f64 {
        if FloatExt::eq(skill, 0.0) || self.entries.is_empty() {
            return 0.0;
        }

        if accuracy >= 1.0 {
            return self.ss_probability(skill);
        }

        let mut mean = 0.0;
        let mut variance = 0.0;

        for (probabilities, count) in self.judgements(skill) {
            mean += probabilities.score * count;
            variance += probabilities.variance * count;
        }

        mean /= self.n_notes;
        let deviation = variance.sqrt() / self.n_notes;

        1.0 - normal_cdf(mean, deviation, accuracy)
    }

    /// Product of the probabilities to hit the best judgement on every note.
    fn ss_probability(&self, skill: f64) -> f64 {
        self.product(skill, |probabilities| probabilities.max_value(self.is_classic))
    }

    /// Probability that a player of `skill` misses at most `misses` notes.
    pub fn miss_probability(&self, skill: f64, misses: u32) -> f64 {
        if FloatExt::eq(skill, 0.0) || self.entries.is_empty() {
            return 0.0;
        }

        if misses == 0 {
            return self.product(skill, |probabilities| 1.0 - probabilities.miss);
        }

        let distribution = PoissonBinomial::new(
            self.judgements(skill)
                .map(|(probabilities, count)| (probabilities.miss, count)),
        );

        distribution.cdf(f64::from(misses))
    }

    /// Skill at which `accuracy` is reached with probability `target`.
    pub fn skill_for_accuracy(&self, accuracy: f64, target: f64) -> f64 {
        self.find_skill(|skill| self.accuracy_probability(skill, accuracy) - target)
    }

    /// Skill at which at most `misses` misses happen with probability `target`.
    pub fn skill_for_misses(&self, misses: u32, target: f64) -> f64 {
        self.find_skill(|skill| self.miss_probability(skill, misses) - target)
    }

    fn find_skill(&self, f: impl FnMut(f64) -> f64) -> f64 {
        if self.entries.is_empty() || self.max_difficulty <= 0.0 {
            return 0.0;
        }

        let result =
            RootFinding::find_root_expand(f, 0.0, self.max_difficulty, Self::ROOT_ACCURACY);

        if !result.is_converged() {
            log::debug!("skill search did not converge, using {}", result.value());
        }

        result.value().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::mods::GameMods;

    use super::*;

    const TARGET: f64 = 0.02;

    fn windows() -> HitWindows {
        HitWindows::new(8.0, GameMods::default(), false)
    }

    fn smooth_difficulties(n: usize) -> Vec<f64> {
        (0..n).map(|i| 5.0 + (i as f64 * 0.37).sin()).collect()
    }

    #[test]
    fn zero_skill_never_succeeds() {
        let simulator = AccuracySimulator::exact(&[4.0, 5.0], &[], windows(), false);

        assert!(simulator.accuracy_probability(0.0, 0.9).almost_eq(0.0, 0.0));
        assert!(simulator.miss_probability(0.0, 3).almost_eq(0.0, 0.0));
    }

    #[test]
    fn probabilities_grow_with_skill() {
        let simulator = AccuracySimulator::exact(&smooth_difficulties(40), &[], windows(), false);

        let low = simulator.accuracy_probability(3.0, 0.95);
        let high = simulator.accuracy_probability(30.0, 0.95);

        assert!(low < high);
        assert!(simulator.miss_probability(3.0, 0) < simulator.miss_probability(30.0, 0));
    }

    #[test]
    fn found_skill_hits_target() {
        let simulator = AccuracySimulator::exact(&smooth_difficulties(50), &[5.0; 5], windows(), false);

        let skill = simulator.skill_for_accuracy(0.97, TARGET);

        assert!(skill > 0.0);
        assert!(simulator.accuracy_probability(skill, 0.97).almost_eq(TARGET, 1e-5));
    }

    #[test]
    fn ss_needs_more_skill() {
        let simulator = AccuracySimulator::exact(&smooth_difficulties(30), &[], windows(), false);

        let ss = simulator.skill_for_accuracy(1.0, TARGET);
        let acc_95 = simulator.skill_for_accuracy(0.95, TARGET);

        assert!(ss > acc_95);
    }

    #[test]
    fn harder_target_needs_more_skill() {
        let simulator = AccuracySimulator::exact(&smooth_difficulties(60), &[], windows(), false);

        let relaxed = simulator.skill_for_accuracy(0.97, 0.02);
        let strict = simulator.skill_for_accuracy(0.97, 0.5);

        assert!(strict >= relaxed);
    }

    #[test]
    fn binning_matches_exact_at_threshold() {
        let difficulties = smooth_difficulties(128);
        let (heads, tails) = difficulties.split_at(96);

        let exact = AccuracySimulator::exact(heads, tails, windows(), false);
        let binned = AccuracySimulator::binned(heads, tails, windows(), false, 64);

        for accuracy in [0.995, 0.99, 0.97, 0.9] {
            let a = exact.skill_for_accuracy(accuracy, TARGET);
            let b = binned.skill_for_accuracy(accuracy, TARGET);

            assert!((a - b).abs() <= 1e-3 * a, "{accuracy}: {a} vs {b}");
        }

        let a = exact.skill_for_accuracy(1.0, TARGET);
        let b = binned.skill_for_accuracy(1.0, TARGET);

        assert!(a > 0.0);
        assert!(a.almost_eq(b, 1e-9 * a), "SS: {a} vs {b}");
    }

    #[test]
    fn binned_misses_match_exact() {
        let difficulties = smooth_difficulties(64);
        let (heads, tails) = difficulties.split_at(48);

        let exact = AccuracySimulator::exact(heads, tails, windows(), true);
        let binned = AccuracySimulator::binned(heads, tails, windows(), true, 32);

        for misses in [0, 1, 3, 10] {
            let a = exact.skill_for_misses(misses, TARGET);
            let b = binned.skill_for_misses(misses, TARGET);

            assert!((a - b).abs() <= 1e-3 * a, "{misses}: {a} vs {b}");
        }
    }

    #[test]
    fn threshold_selects_path() {
        let difficulties = smooth_difficulties(129);

        let below = AccuracySimulator::new(&difficulties[..128], &[], windows(), false, 128, 64);
        let above = AccuracySimulator::new(&difficulties, &[], windows(), false, 128, 64);

        assert_eq!(below.entries.len(), 128);
        assert_eq!(above.entries.len(), 64);
        assert!(above.n_notes().almost_eq(129.0, 1e-12));
    }

    #[test]
    fn trivial_notes_have_no_skill() {
        let simulator = AccuracySimulator::exact(&[0.0, 0.0], &[], windows(), false);

        assert!(simulator.skill_for_accuracy(0.97, TARGET).almost_eq(0.0, 0.0));
    }
}
