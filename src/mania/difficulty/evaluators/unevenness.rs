use crate::{
    mania::difficulty::corners::GridCursor,
    util::smoothing::{smooth_on_corners, SmoothMode},
};

/// Penalizes unsteady alternation between neighbouring active columns.
///
/// Evaluated on the coarse grid, reading gaps from the base grid.
pub struct UnevennessEvaluator;

impl UnevennessEvaluator {
    const EXCESS_THRESHOLD: f64 = 0.3;
    const EXCESS_WEIGHT: f64 = 0.4;

    pub fn evaluate(
        a_grid: &[f64],
        base: &[f64],
        active_columns: &[Vec<usize>],
        deltas: &[Vec<f64>],
    ) -> Vec<f64> {
        let mut cursor = GridCursor::new(base);
        let last = base.len().saturating_sub(1);

        let unevenness: Vec<_> = a_grid
            .iter()
            .map(|&corner| {
                let idx = cursor.seek(corner).min(last);

                active_columns[idx]
                    .windows(2)
                    .map(|pair| {
                        let (d0, d1) = (deltas[pair[0]][idx], deltas[pair[1]][idx]);

                        Self::factor(d0, d1)
                    })
                    .product()
            })
            .collect();

        smooth_on_corners(a_grid, &unevenness, 250.0, 1.0, SmoothMode::Average)
    }

    fn factor(d0: f64, d1: f64) -> f64 {
        let max = d0.max(d1);
        let diff = (d0 - d1).abs() + Self::EXCESS_WEIGHT * (max - Self::EXCESS_THRESHOLD).max(0.0);

        if diff < 0.02 {
            (0.75 + 0.5 * max).min(1.0)
        } else if diff < 0.07 {
            (0.65 + 5.0 * diff + 0.5 * max).min(1.0)
        } else {
            1.0
        }
    }
}
