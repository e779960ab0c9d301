use std::mem;

use crate::mania::difficulty::{
    evaluators::{IndividualStrainEvaluator, OverallStrainEvaluator},
    object::ManiaDifficultyObject,
};

/// Running strain values between two notes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrainState {
    individual_strains: Box<[f64]>,
    highest_individual_strain: f64,
    overall_strain: f64,
}

impl StrainState {
    const INDIVIDUAL_DECAY_BASE: f64 = 0.125;
    const OVERALL_DECAY_BASE: f64 = 0.3;

    pub fn new(total_columns: usize) -> Self {
        Self {
            individual_strains: vec![0.0; total_columns].into_boxed_slice(),
            highest_individual_strain: 0.0,
            overall_strain: 1.0,
        }
    }

    /// Advance the state by one note and return its strain.
    pub fn next(
        mut self,
        curr: &ManiaDifficultyObject,
        objects: &[ManiaDifficultyObject],
    ) -> (Self, f64) {
        let column = curr.column;

        self.individual_strains[column] = apply_decay(
            self.individual_strains[column],
            curr.column_strain_time,
            Self::INDIVIDUAL_DECAY_BASE,
        );

        self.individual_strains[column] += IndividualStrainEvaluator::evaluate_diff_of(curr, objects);

        // * Take the hardest individualStrain for notes that happen at the same time (in a chord).
        // * This is to ensure the order in which the notes are processed does not affect the resultant total strain.
        self.highest_individual_strain = if curr.delta_time <= 1.0 {
            self.highest_individual_strain
                .max(self.individual_strains[column])
        } else {
            self.individual_strains[column]
        };

        self.overall_strain = apply_decay(
            self.overall_strain,
            curr.delta_time,
            Self::OVERALL_DECAY_BASE,
        );
        self.overall_strain += OverallStrainEvaluator::evaluate_diff_of(curr, objects);

        let strain = self.highest_individual_strain + self.overall_strain;

        (self, strain)
    }

    /// Strain at `time` if no further note is hit after `prev_start_time`.
    pub fn decayed_at(&self, time: f64, prev_start_time: f64) -> f64 {
        apply_decay(
            self.highest_individual_strain,
            time - prev_start_time,
            Self::INDIVIDUAL_DECAY_BASE,
        ) + apply_decay(
            self.overall_strain,
            time - prev_start_time,
            Self::OVERALL_DECAY_BASE,
        )
    }
}

/// Per-note strains and their section peaks.
#[derive(Clone, Debug, PartialEq)]
pub struct Strain {
    state: StrainState,
    note_strains: Vec<f64>,
    strain_peaks: Vec<f64>,
    current_section_peak: f64,
    current_section_end: f64,
}

impl Strain {
    const SECTION_LENGTH: f64 = 400.0;
    const DECAY_WEIGHT: f64 = 0.9;

    pub fn new(total_columns: usize) -> Self {
        Self {
            state: StrainState::new(total_columns),
            // The first note has no difficulty object
            note_strains: vec![0.0],
            strain_peaks: Vec::new(),
            current_section_peak: 0.0,
            current_section_end: 0.0,
        }
    }

    pub fn process(&mut self, curr: &ManiaDifficultyObject, objects: &[ManiaDifficultyObject]) {
        if curr.idx == 0 {
            self.current_section_end =
                (curr.start_time / Self::SECTION_LENGTH).ceil() * Self::SECTION_LENGTH;
        }

        while curr.start_time > self.current_section_end {
            self.strain_peaks.push(self.current_section_peak);

            let prev_start_time = curr.previous(objects).map_or(0.0, |prev| prev.start_time);
            self.current_section_peak = self
                .state
                .decayed_at(self.current_section_end, prev_start_time);
            self.current_section_end += Self::SECTION_LENGTH;
        }

        let (state, strain) = mem::take(&mut self.state).next(curr, objects);
        self.state = state;

        self.current_section_peak = self.current_section_peak.max(strain);
        self.note_strains.push(strain);
    }

    /// Strain of every note in map order.
    pub fn note_strains(&self) -> &[f64] {
        &self.note_strains
    }

    /// Section peaks including the current section.
    pub fn current_strain_peaks(&self) -> Vec<f64> {
        let mut peaks = self.strain_peaks.clone();

        if self.note_strains.len() > 1 {
            peaks.push(self.current_section_peak);
        }

        peaks
    }

    /// Weighted sum of the descending section peaks.
    pub fn difficulty_value(&self) -> f64 {
        let mut peaks = self.current_strain_peaks();
        peaks.sort_unstable_by(|a, b| b.total_cmp(a));

        let mut difficulty = 0.0;
        let mut weight = 1.0;

        for strain in peaks {
            difficulty += strain * weight;
            weight *= Self::DECAY_WEIGHT;
        }

        difficulty
    }
}

fn apply_decay(value: f64, delta_time: f64, decay_base: f64) -> f64 {
    value * f64::powf(decay_base, delta_time / 1000.0)
}
