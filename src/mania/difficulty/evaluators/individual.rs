use crate::mania::difficulty::object::ManiaDifficultyObject;

pub struct IndividualStrainEvaluator;

impl IndividualStrainEvaluator {
    const HOLD_FACTOR: f64 = 1.25;

    pub fn evaluate_diff_of(curr: &ManiaDifficultyObject, objects: &[ManiaDifficultyObject]) -> f64 {
        let start_time = curr.start_time;
        let end_time = curr.end_time;

        // * We award a bonus if this note starts and ends before the end of another hold note.
        let with_bonus = curr.prev_in_columns(objects).any(|prev| {
            prev.end_time > end_time + 1.0 && start_time > prev.start_time + 1.0
        });

        let hold_factor = if with_bonus { Self::HOLD_FACTOR } else { 1.0 };

        2.0 * hold_factor
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::hit_object::ManiaNote, util::float_ext::FloatExt};

    use super::*;

    #[test]
    fn bonus_inside_hold() {
        let notes = [
            ManiaNote::tap(2, 0),
            ManiaNote::hold(0, 100, 1000),
            ManiaNote::tap(1, 500),
            ManiaNote::tap(1, 1500),
        ];
        let objects = ManiaDifficultyObject::create_all(&notes, 3);

        let inside = IndividualStrainEvaluator::evaluate_diff_of(&objects[1], &objects);
        let after = IndividualStrainEvaluator::evaluate_diff_of(&objects[2], &objects);

        assert!(inside.almost_eq(2.5, 0.0));
        assert!(after.almost_eq(2.0, 0.0));
    }
}
