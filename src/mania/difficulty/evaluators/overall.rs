use crate::{mania::difficulty::object::ManiaDifficultyObject, util::difficulty::logistic};

pub struct OverallStrainEvaluator;

impl OverallStrainEvaluator {
    const RELEASE_THRESHOLD: f64 = 30.0;

    pub fn evaluate_diff_of(curr: &ManiaDifficultyObject, objects: &[ManiaDifficultyObject]) -> f64 {
        let start_time = curr.start_time;
        let end_time = curr.end_time;
        let mut is_overlapping = false;

        // * Lowest value we can assume with the current information
        let mut closest_end_time = (end_time - start_time).abs();
        // * Factor to all additional strains in case something else is held
        let mut hold_factor = 1.0;
        // * Addition to the current note in case it's a hold and has to be released awkwardly
        let mut hold_addition = 0.0;

        for prev in curr.prev_in_columns(objects) {
            // * The current note is overlapped if a previous note or end is
            // * overlapping the current note body
            is_overlapping |= prev.end_time > start_time + 1.0
                && end_time > prev.end_time + 1.0
                && start_time > prev.start_time + 1.0;

            // * We give a slight bonus to everything if something is held meanwhile
            if prev.end_time > end_time + 1.0 && start_time > prev.start_time + 1.0 {
                hold_factor = 1.25;
            }

            closest_end_time = closest_end_time.min((end_time - prev.end_time).abs());
        }

        // * Releasing multiple notes is just as easy as releasing 1. Nerfs the hold addition
        // * by half if the closest release is release_threshold away.
        if is_overlapping {
            hold_addition = logistic(closest_end_time, Self::RELEASE_THRESHOLD, 0.27, None);
        }

        (1.0 + hold_addition) * hold_factor
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::hit_object::ManiaNote, util::float_ext::FloatExt};

    use super::*;

    #[test]
    fn overlapping_release() {
        let notes = [
            ManiaNote::tap(2, 0),
            ManiaNote::hold(0, 100, 600),
            ManiaNote::hold(1, 300, 1000),
        ];
        let objects = ManiaDifficultyObject::create_all(&notes, 3);

        let plain = OverallStrainEvaluator::evaluate_diff_of(&objects[0], &objects);
        let overlapped = OverallStrainEvaluator::evaluate_diff_of(&objects[1], &objects);

        assert!(plain.almost_eq(1.0, 0.0));
        // releases 400ms apart get the full addition
        assert!(overlapped.almost_eq(2.0, 1e-9));
    }
}
