/*!
Evenly spaced evaluation grids.

A [`Grid`] is the half-open range `[start, stop)` sampled every `step`, the same
convention as `arange`. The default grid runs from -10.0 to 9.9 in steps of 0.1.

```rust
use tempered_density::grid::Grid;

let grid = Grid::new(-10.0, 10.0, 0.1).unwrap();
assert_eq!(grid.len(), 200);
assert!((grid.point(199) - 9.9).abs() < 1e-12);
```
*/

use ndarray::Array1;

use crate::error::{DensityError, Result};

// Relative slack on the point count so that 20.0 / 0.1 does not become 201 points.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Largest number of points a grid may hold.
pub const MAX_POINTS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    start: f64,
    step: f64,
    points: Array1<f64>,
}

impl Grid {
    /// Builds the grid `start, start + step, ...` up to but excluding `stop`.
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite())
            || step <= 0.0
            || stop <= start
        {
            return Err(DensityError::InvalidGrid { start, stop, step });
        }
        let ratio = (stop - start) / step;
        let count = (ratio - ratio * COUNT_TOLERANCE).ceil();
        if !count.is_finite() || count < 1.0 || count > MAX_POINTS as f64 {
            return Err(DensityError::InvalidGrid { start, stop, step });
        }
        let len = count as usize;
        let points = Array1::from_iter((0..len).map(|i| start + i as f64 * step));
        Ok(Self {
            start,
            step,
            points,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `i`-th grid point. Panics if `i` is out of range.
    pub fn point(&self, i: usize) -> f64 {
        self.points[i]
    }

    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    /// Index of the grid cell `[x_i, x_i + step)` containing `x`, if any.
    pub fn cell_of(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < self.start {
            return None;
        }
        let i = ((x - self.start) / self.step).floor() as usize;
        (i < self.len()).then_some(i)
    }

    /// Lower and upper edge of the grid, the latter being the last point plus one step.
    pub fn bounds(&self) -> (f64, f64) {
        (self.start, self.start + self.len() as f64 * self.step)
    }
}

impl Default for Grid {
    fn default() -> Self {
        let points = Array1::from_iter((0..200).map(|i| -10.0 + i as f64 * 0.1));
        Self {
            start: -10.0,
            step: 0.1,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_grid_has_200_points() {
        let grid = Grid::new(-10.0, 10.0, 0.1).unwrap();
        assert_eq!(grid.len(), 200);
        assert_eq!(grid, Grid::default());
        assert_abs_diff_eq!(grid.point(0), -10.0);
        assert_abs_diff_eq!(grid.point(100), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.point(199), 9.9, epsilon = 1e-12);
    }

    #[test]
    fn spacing_is_uniform() {
        let grid = Grid::default();
        for w in grid.points().windows(2) {
            assert_abs_diff_eq!(w[1] - w[0], 0.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn partial_last_step_is_included() {
        let grid = Grid::new(0.0, 1.05, 0.1).unwrap();
        assert_eq!(grid.len(), 11);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            Grid::new(0.0, 1.0, 0.0),
            Err(DensityError::InvalidGrid { .. })
        ));
        assert!(Grid::new(0.0, 1.0, -0.1).is_err());
        assert!(Grid::new(1.0, 1.0, 0.1).is_err());
        assert!(Grid::new(f64::NAN, 1.0, 0.1).is_err());
        assert!(Grid::new(0.0, f64::INFINITY, 0.1).is_err());
    }

    #[test]
    fn rejects_too_many_points() {
        assert!(matches!(
            Grid::new(0.0, 1.0, 1e-300),
            Err(DensityError::InvalidGrid { .. })
        ));
        assert!(Grid::new(-1e300, 1e300, 1.0).is_err());
        assert!(Grid::new(0.0, MAX_POINTS as f64 + 1.0, 1.0).is_err());
    }

    #[test]
    fn large_grids_get_no_spurious_last_point() {
        let grid = Grid::new(0.0, 0.1, 1e-7).unwrap();
        assert_eq!(grid.len(), 1_000_000);
        let grid = Grid::new(-1.5, 1.5, 3e-6).unwrap();
        assert_eq!(grid.len(), 1_000_000);
    }

    #[test]
    fn cell_lookup() {
        let grid = Grid::default();
        assert_eq!(grid.cell_of(-10.0), Some(0));
        assert_eq!(grid.cell_of(0.05), Some(100));
        assert_eq!(grid.cell_of(9.95), Some(199));
        assert_eq!(grid.cell_of(10.0), None);
        assert_eq!(grid.cell_of(-10.01), None);
        assert_eq!(grid.cell_of(f64::NAN), None);
    }
}
