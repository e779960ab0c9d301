use std::cmp;

use crate::{
    difficulty::Difficulty,
    mania::{
        attributes::ManiaDifficultyAttributes,
        difficulty::{
            aggregator::{CornerSignals, DifficultyAggregator},
            corners::CornerGrids,
            evaluators::{
                note_density, AnchorEvaluator, CrossColumnEvaluator, KeyUsage, PressEvaluator,
                ReleaseEvaluator, SameColumnEvaluator, UnevennessEvaluator,
            },
            object::ManiaDifficultyObject,
            reducer::{CornerData, DifficultyReducer, ReducedDifficulty},
            sequence::NoteSequence,
            skills::{
                accuracy::{AccuracySkillValues, ManiaAccuracySkill},
                strain::Strain,
            },
            switches::SwitchEvaluator,
            variety::VarietyEvaluator,
        },
    },
    model::{beatmap::ManiaBeatmap, hit_object::ManiaNote, hit_windows::HitWindows},
    util::smoothing::{interp_values, step_interp},
};

pub mod aggregator;
pub mod corners;
pub mod evaluators;
pub mod object;
pub mod reducer;
pub mod sequence;
pub mod skills;
pub mod switches;
pub mod variety;

const DIFFICULTY_MULTIPLIER: f64 = 0.018;

pub fn difficulty(difficulty: &Difficulty, map: &ManiaBeatmap) -> ManiaDifficultyAttributes {
    let take = cmp::min(difficulty.get_passed_objects(), map.notes().len());
    let passed = &map.notes()[..take];

    let n_objects = take as u32;
    let n_hold_notes = passed.iter().filter(|note| note.is_hold_note()).count() as u32;

    let is_classic = !difficulty.get_lazer();
    let clock_rate = difficulty.get_clock_rate();
    let od = difficulty.get_od().unwrap_or(map.od());
    let windows = HitWindows::new(od, difficulty.get_mods(), is_classic);

    let mut attrs = ManiaDifficultyAttributes {
        accuracy_curve: vec![0.0; ManiaAccuracySkill::ACCURACY_THRESHOLDS.len()],
        miss_curve: vec![0.0; ManiaAccuracySkill::MISS_COUNTS.len()],
        hit_windows: windows.with_clock_rate(clock_rate),
        n_objects,
        n_hold_notes,
        max_combo: n_objects + n_hold_notes,
        key_count: map.key_count() as u32,
        ..Default::default()
    };

    if passed.is_empty() {
        return attrs;
    }

    let notes = prepare_notes(passed, clock_rate);
    let seq = NoteSequence::new(map.key_count(), notes);

    let values = DifficultyValues::calculate(&seq, &windows, attrs.hit_windows, is_classic);

    let DifficultyValues {
        reduced,
        switches,
        variety,
        total_notes,
        strain,
        accuracy,
    } = values;

    attrs.stars = reduced.stars;
    attrs.spikiness = reduced.spikiness;
    attrs.switches = switches;
    attrs.variety = variety;
    attrs.acc_scalar = 0.5 * reduced.spikiness + 0.5 * switches;
    attrs.total_notes = total_notes;
    attrs.strain_stars = strain.difficulty_value() * DIFFICULTY_MULTIPLIER;
    attrs.acc_skill = accuracy.acc_skill;
    attrs.fc_skill = accuracy.fc_skill;
    attrs.accuracy_curve = accuracy.accuracy_curve;
    attrs.miss_curve = accuracy.miss_curve;

    attrs
}

/// Shift negative times to zero and convert into real time.
fn prepare_notes(notes: &[ManiaNote], clock_rate: f64) -> Vec<ManiaNote> {
    let first = notes.iter().map(|note| note.head_time).min().unwrap_or(0);
    let offset = (-first).max(0);

    let mut notes: Vec<_> = notes
        .iter()
        .map(|note| note.scaled(clock_rate, offset))
        .collect();

    notes.sort_unstable();

    notes
}

pub struct DifficultyValues {
    pub reduced: ReducedDifficulty,
    pub switches: f64,
    pub variety: f64,
    pub total_notes: f64,
    pub strain: Strain,
    pub accuracy: AccuracySkillValues,
}

impl DifficultyValues {
    /// `windows` are at rate 1.0 and determine the leniency while
    /// `clock_windows` are in real time.
    pub fn calculate(
        seq: &NoteSequence,
        windows: &HitWindows,
        clock_windows: HitWindows,
        is_classic: bool,
    ) -> Self {
        let grids = CornerGrids::new(seq);
        let usage = KeyUsage::new(seq, &grids.base);

        let corners = Self::corner_data(seq, &grids, &usage, windows.leniency(), is_classic);
        let reduced = DifficultyReducer::reduce(&corners, seq.total_notes());

        let switches = SwitchEvaluator::evaluate(seq, &grids.base, &usage.key_counts);
        let variety = VarietyEvaluator::evaluate(seq);

        let strain = Self::strain(seq);
        let accuracy = Self::accuracy(seq, strain.note_strains(), clock_windows, is_classic);

        log::debug!(
            "{} notes: stars={} spikiness={} switches={switches} variety={variety}",
            seq.len(),
            reduced.stars,
            reduced.spikiness,
        );

        Self {
            reduced,
            switches,
            variety,
            total_notes: seq.total_notes(),
            strain,
            accuracy,
        }
    }

    /// Evaluate every signal and aggregate them on the final grid.
    pub fn corner_data(
        seq: &NoteSequence,
        grids: &CornerGrids,
        usage: &KeyUsage,
        leniency: f64,
        is_classic: bool,
    ) -> Vec<CornerData> {
        let base = &grids.base;
        let all = &grids.all;

        let same_column = SameColumnEvaluator::evaluate(seq, base, leniency);
        let cross = CrossColumnEvaluator::evaluate(seq, base, usage, leniency);
        let anchor = AnchorEvaluator::evaluate(&usage.usage_400, base.len());
        let press = PressEvaluator::evaluate(seq, base, &anchor, leniency);
        let release = ReleaseEvaluator::evaluate(seq, base, leniency);
        let unevenness = UnevennessEvaluator::evaluate(
            &grids.a,
            base,
            &usage.active_columns,
            &same_column.deltas,
        );
        let density = note_density(seq, base, !is_classic);

        let jack = interp_values(all, base, &same_column.jack);
        let cross = interp_values(all, base, &cross);
        let press = interp_values(all, base, &press);
        let release = interp_values(all, base, &release);
        let unevenness = interp_values(all, &grids.a, &unevenness);
        let density = step_interp(all, base, &density);
        let key_counts = step_interp(all, base, &usage.key_counts);

        let weights = DifficultyReducer::corner_weights(all, &density);

        all.iter()
            .enumerate()
            .map(|(i, &time)| {
                let signals = CornerSignals {
                    jack: jack[i],
                    cross: cross[i],
                    press: press[i],
                    unevenness: unevenness[i],
                    release: release[i],
                    density: density[i],
                    key_count: key_counts[i],
                };

                CornerData {
                    time,
                    signals,
                    strain: DifficultyAggregator::aggregate(&signals),
                    weight: weights[i],
                }
            })
            .collect()
    }

    fn strain(seq: &NoteSequence) -> Strain {
        let objects = ManiaDifficultyObject::create_all(&seq.notes, seq.key_count);
        let mut strain = Strain::new(seq.key_count);

        for curr in objects.iter() {
            strain.process(curr, &objects);
        }

        strain
    }

    /// Feed every head and tail into the accuracy skill. Tails share the
    /// strain of their head.
    fn accuracy(
        seq: &NoteSequence,
        note_strains: &[f64],
        windows: HitWindows,
        is_classic: bool,
    ) -> AccuracySkillValues {
        let mut skill = ManiaAccuracySkill::new(windows, is_classic);

        for (note, &strain) in seq.notes.iter().zip(note_strains) {
            skill.process(strain, false);

            if note.is_hold_note() {
                skill.process(strain, true);
            }
        }

        skill.evaluate()
    }
}
