use crate::model::hit_object::ManiaNote;

/// A note together with the context the strain evaluators need.
///
/// The first note of a map has no difficulty object.
pub struct ManiaDifficultyObject {
    pub idx: usize,
    pub delta_time: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub column: usize,
    /// Per column, index of the latest earlier object in that column.
    pub prev_hit_objects: Box<[Option<usize>]>,
    pub column_strain_time: f64,
}

impl ManiaDifficultyObject {
    pub fn new(
        base: &ManiaNote,
        last_object: &ManiaNote,
        objects: &[Self],
        per_column_objects: &[Vec<usize>],
    ) -> Self {
        let idx = objects.len();

        let start_time = f64::from(base.head_time);
        let delta_time = f64::from(base.head_time - last_object.head_time);
        let end_time = f64::from(base.end_time());

        let total_columns = per_column_objects.len();
        let column = base.column;

        let column_strain_time = start_time
            - per_column_objects[column]
                .last()
                .map_or(start_time, |&prev| objects[prev].start_time);

        let prev_hit_objects = match objects.last() {
            Some(prev) => {
                let mut prev_hit_objects = prev.prev_hit_objects.clone();

                // * intentionally depends on processing order to match live.
                prev_hit_objects[prev.column] = Some(prev.idx);

                prev_hit_objects
            }
            None => vec![None; total_columns].into_boxed_slice(),
        };

        Self {
            idx,
            delta_time,
            start_time,
            end_time,
            column,
            prev_hit_objects,
            column_strain_time,
        }
    }

    /// Create difficulty objects for all but the first note.
    pub fn create_all(notes: &[ManiaNote], total_columns: usize) -> Vec<Self> {
        let mut objects = Vec::with_capacity(notes.len().saturating_sub(1));
        let mut per_column_objects = vec![Vec::new(); total_columns];

        for pair in notes.windows(2) {
            let curr = Self::new(&pair[1], &pair[0], &objects, &per_column_objects);

            per_column_objects[curr.column].push(curr.idx);
            objects.push(curr);
        }

        objects
    }

    pub fn previous<'a>(&self, objects: &'a [Self]) -> Option<&'a Self> {
        self.idx.checked_sub(1).and_then(|idx| objects.get(idx))
    }

    /// Latest earlier objects of every column.
    pub fn prev_in_columns<'a>(&'a self, objects: &'a [Self]) -> impl Iterator<Item = &'a Self> {
        self.prev_hit_objects
            .iter()
            .flatten()
            .map(move |&idx| &objects[idx])
    }
}
