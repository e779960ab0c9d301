//! Windowed integration and interpolation over sorted, irregular grids.
//!
//! Values are piecewise constant: `values[i]` holds on `[grid[i], grid[i + 1])`.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SmoothMode {
    /// Windowed integral multiplied by a scale.
    Sum,
    /// Windowed integral divided by the window's actual width.
    Average,
}

/// Prefix integrals of `values` over `grid`.
pub fn cumulative_sum(grid: &[f64], values: &[f64]) -> Vec<f64> {
    let mut prefix = vec![0.0; grid.len()];

    for i in 1..grid.len() {
        prefix[i] = prefix[i - 1] + values[i - 1] * (grid[i] - grid[i - 1]);
    }

    prefix
}

/// Integral of `values` from `grid[0]` up to `q`, clamped to the grid.
pub fn query_cumulative_sum(q: f64, grid: &[f64], prefix: &[f64], values: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (grid.first(), grid.last()) else {
        return 0.0;
    };

    if q <= first {
        return 0.0;
    }

    if q >= last {
        return prefix[prefix.len() - 1];
    }

    let i = grid.partition_point(|&x| x < q) - 1;

    prefix[i] + values[i] * (q - grid[i])
}

/// Integral of `values` over `[from, to]`.
pub fn query_range_sum(prefix: &[f64], grid: &[f64], values: &[f64], from: f64, to: f64) -> f64 {
    query_cumulative_sum(to, grid, prefix, values) - query_cumulative_sum(from, grid, prefix, values)
}

/// Moving window of radius `window` around each grid point.
pub fn smooth_on_corners(
    grid: &[f64],
    values: &[f64],
    window: f64,
    scale: f64,
    mode: SmoothMode,
) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (grid.first(), grid.last()) else {
        return Vec::new();
    };

    let prefix = cumulative_sum(grid, values);

    grid.iter()
        .map(|&s| {
            let a = (s - window).max(first);
            let b = (s + window).min(last);
            let integral = query_range_sum(&prefix, grid, values, a, b);

            match mode {
                SmoothMode::Sum => scale * integral,
                SmoothMode::Average if b - a > 1e-9 => integral / (b - a),
                SmoothMode::Average => 0.0,
            }
        })
        .collect()
}

/// Piecewise-linear interpolation, flat outside the source domain.
pub fn interp_values(new_grid: &[f64], old_grid: &[f64], old_values: &[f64]) -> Vec<f64> {
    if old_values.is_empty() {
        return vec![0.0; new_grid.len()];
    }

    new_grid
        .iter()
        .map(|&x| {
            let idx = old_grid.partition_point(|&v| v < x);

            if idx == 0 {
                old_values[0]
            } else if idx >= old_grid.len() {
                old_values[old_values.len() - 1]
            } else {
                let (x0, x1) = (old_grid[idx - 1], old_grid[idx]);
                let (y0, y1) = (old_values[idx - 1], old_values[idx]);

                y0 + (x - x0) / (x1 - x0) * (y1 - y0)
            }
        })
        .collect()
}

/// Zero-order hold: the value at the greatest source point `<=` each target,
/// or the first value if there is none.
pub fn step_interp(new_grid: &[f64], old_grid: &[f64], old_values: &[f64]) -> Vec<f64> {
    if old_values.is_empty() {
        return vec![0.0; new_grid.len()];
    }

    new_grid
        .iter()
        .map(|&x| {
            let idx = old_grid
                .partition_point(|&v| v <= x)
                .saturating_sub(1)
                .min(old_values.len() - 1);

            old_values[idx]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn cumulative_sum_is_left_riemann() {
        let grid = [0.0, 1.0, 3.0, 6.0];
        let values = [2.0, 1.0, 4.0, 100.0];

        assert_eq!(cumulative_sum(&grid, &values), vec![0.0, 2.0, 4.0, 16.0]);
    }

    #[test]
    fn range_queries_clamp_to_grid() {
        let grid = [0.0, 1.0, 3.0, 6.0];
        let values = [2.0, 1.0, 4.0, 100.0];
        let prefix = cumulative_sum(&grid, &values);

        assert!(query_range_sum(&prefix, &grid, &values, -5.0, 100.0).almost_eq(16.0, 1e-12));
        assert!(query_range_sum(&prefix, &grid, &values, 0.5, 2.0).almost_eq(2.0, 1e-12));
        assert!(query_range_sum(&prefix, &grid, &values, 4.0, 5.0).almost_eq(4.0, 1e-12));
    }

    #[test]
    fn average_shrinks_window_at_edges() {
        let grid = [0.0, 10.0, 20.0];
        let values = [1.0, 1.0, 1.0];
        let smoothed = smooth_on_corners(&grid, &values, 250.0, 1.0, SmoothMode::Average);

        assert!(smoothed.iter().all(|v| v.almost_eq(1.0, 1e-12)));
    }

    #[test]
    fn sum_scales_integral() {
        let grid = [0.0, 500.0, 1000.0, 1500.0];
        let values = [2.0, 2.0, 2.0, 0.0];
        let smoothed = smooth_on_corners(&grid, &values, 500.0, 0.001, SmoothMode::Sum);

        assert!(smoothed[0].almost_eq(1.0, 1e-12));
        assert!(smoothed[1].almost_eq(2.0, 1e-12));
        assert!(smoothed[3].almost_eq(1.0, 1e-12));
    }

    #[test]
    fn linear_interpolation() {
        let old_grid = [0.0, 10.0];
        let old_values = [0.0, 1.0];

        let new_values = interp_values(&[-5.0, 0.0, 2.5, 10.0, 20.0], &old_grid, &old_values);

        assert_eq!(new_values, vec![0.0, 0.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn step_interpolation_holds_last_value() {
        let old_grid = [5.0, 10.0, 20.0];
        let old_values = [1.0, 2.0, 3.0];

        let new_values = step_interp(&[0.0, 5.0, 9.0, 10.0, 25.0], &old_grid, &old_values);

        assert_eq!(new_values, vec![1.0, 1.0, 1.0, 2.0, 3.0]);
    }
}
