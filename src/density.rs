/*!
# Density curves on a grid

A [`DensityCurve`] holds one density value per grid point. A [`DensityPair`] is the
chart's content: the base density (curve A) and the same density raised to an
inverse temperature `beta` and renormalized by its Riemann sum (curve B).

With the default `beta = 0.5`, curve B is `sqrt(pdf(x)) / (sum(sqrt(pdf)) * step)`.

```rust
use tempered_density::{DensityPair, Grid};

let pair = DensityPair::compute(Grid::default(), 0.5).unwrap();
assert!((pair.tempered.integral(pair.grid.step()) - 1.0).abs() < 1e-9);
assert!((pair.base.integral(pair.grid.step()) - 1.0).abs() < 1e-3);
```
*/

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::config::PlotConfig;
use crate::distributions::{Normal, Normalized};
use crate::error::{DensityError, Result};
use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    label: String,
    values: Array1<f64>,
}

impl DensityCurve {
    pub fn new(label: impl Into<String>, values: Array1<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Evaluates `f` at every grid point.
    pub fn evaluate<F>(label: impl Into<String>, grid: &Grid, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self::new(label, grid.points().mapv(f))
    }

    /// Evaluates the normalized density of `dist` at every grid point.
    pub fn from_density<D>(label: impl Into<String>, grid: &Grid, dist: &D) -> Self
    where
        D: Normalized<f64>,
    {
        Self::evaluate(label, grid, |x| dist.log_prob(&[x]).exp())
    }

    /// Raises every value to the power `beta`. The result is unnormalized.
    pub fn powf(&self, label: impl Into<String>, beta: f64) -> Result<Self> {
        if !beta.is_finite() || beta <= 0.0 {
            return Err(DensityError::InvalidTemperature(beta));
        }
        Ok(Self::new(label, self.values.mapv(|v| v.powf(beta))))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Riemann sum `sum(values) * step`.
    pub fn integral(&self, step: f64) -> f64 {
        self.values.sum() * step
    }

    /// Divides every value by the Riemann sum so the curve integrates to 1 over the grid.
    /// Returns the normalizer that was divided out.
    pub fn normalize(&mut self, step: f64) -> Result<f64> {
        let z = self.integral(step);
        if !z.is_finite() || z <= 0.0 {
            return Err(DensityError::DegenerateNormalizer {
                label: self.label.clone(),
                sum: z,
            });
        }
        log::debug!("normalizing `{}` by {z:.6e}", self.label);
        self.values.mapv_inplace(|v| v / z);
        Ok(z)
    }

    /// Index of the largest value.
    pub fn argmax(&self) -> Result<usize> {
        self.values
            .argmax()
            .map_err(|e| DensityError::Stats(format!("argmax of `{}`: {e}", self.label)))
    }

    pub fn max(&self) -> Result<f64> {
        Ok(self.values[self.argmax()?])
    }
}

/// The base density and its tempered, renormalized counterpart on a shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityPair {
    pub grid: Grid,
    pub base: DensityCurve,
    pub tempered: DensityCurve,
    pub beta: f64,
    /// Riemann sum of the tempered curve before it was normalized.
    pub normalizer: f64,
}

impl DensityPair {
    /// Standard normal density and its `beta`-tempered version on `grid`.
    pub fn compute(grid: Grid, beta: f64) -> Result<Self> {
        Self::compute_for(grid, &Normal::standard(), beta)
    }

    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        Self::compute(config.grid()?, config.beta)
    }

    pub fn compute_for<D: Normalized<f64>>(grid: Grid, dist: &D, beta: f64) -> Result<Self> {
        let base = DensityCurve::from_density("p(x)", &grid, dist);
        let mut tempered = base.powf(format!("p(x)^{beta} / Z"), beta)?;
        let normalizer = tempered.normalize(grid.step())?;
        Ok(Self {
            grid,
            base,
            tempered,
            beta,
            normalizer,
        })
    }

    /// `(x, base, tempered)` for every grid point.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid
            .points()
            .iter()
            .zip(self.base.values())
            .zip(self.tempered.values())
            .map(|((&x, &a), &b)| (x, a, b))
    }

    /// Largest value across both curves.
    pub fn peak(&self) -> Result<f64> {
        Ok(self.base.max()?.max(self.tempered.max()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::Tempered;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn normalize_rescales_to_unit_integral() {
        let grid = Grid::new(0.0, 1.0, 0.25).unwrap();
        let mut curve = DensityCurve::evaluate("flat", &grid, |_| 2.0);
        let z = curve.normalize(grid.step()).unwrap();
        assert_abs_diff_eq!(z, 2.0);
        assert_abs_diff_eq!(curve.integral(grid.step()), 1.0);
        assert!(curve.values().iter().all(|&v| (v - 1.0).abs() < 1e-15));
    }

    #[test]
    fn normalize_rejects_zero_curve() {
        let grid = Grid::default();
        let mut curve = DensityCurve::evaluate("zero", &grid, |_| 0.0);
        assert!(matches!(
            curve.normalize(grid.step()),
            Err(DensityError::DegenerateNormalizer { .. })
        ));
    }

    #[test]
    fn argmax_with_nan_fails() {
        let curve = DensityCurve::new("bad", ndarray::arr1(&[0.1, f64::NAN, 0.3]));
        assert!(matches!(curve.argmax(), Err(DensityError::Stats(_))));
    }

    #[test]
    fn powf_rejects_bad_beta() {
        let curve = DensityCurve::evaluate("p", &Grid::default(), |x| x.abs());
        assert!(curve.powf("q", 0.0).is_err());
        assert!(curve.powf("q", f64::NAN).is_err());
    }

    #[test]
    fn half_tempered_normal_matches_wider_normal() {
        let pair = DensityPair::compute(Grid::default(), 0.5).unwrap();
        let wide = Normal::new(0.0, 2f64.sqrt());
        for (x, _, b) in pair.rows() {
            assert_abs_diff_eq!(b, wide.pdf(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn tempered_matches_closed_form_for_other_betas() {
        let normal = Normal::<f64>::standard();
        for beta in [0.75, 2.0] {
            let pair = DensityPair::compute(Grid::default(), beta).unwrap();
            let exact = Tempered::new(normal, beta).unwrap().as_normal();
            for (x, _, b) in pair.rows() {
                assert_abs_diff_eq!(b, exact.pdf(x), epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn normalizer_is_riemann_sum_of_sqrt_density() {
        let pair = DensityPair::compute(Grid::default(), 0.5).unwrap();
        // integral of sqrt(phi) is (2 pi)^(-1/4) * sqrt(4 pi) = 2^(3/4) pi^(1/4)
        let exact = 2f64.powf(0.75) * std::f64::consts::PI.powf(0.25);
        assert_relative_eq!(pair.normalizer, exact, epsilon = 1e-9);
    }

    #[test]
    fn compute_for_custom_density() {
        let pair = DensityPair::compute_for(Grid::default(), &Normal::new(2.0, 1.0), 1.0).unwrap();
        let mode = pair.grid.point(pair.base.argmax().unwrap());
        assert_abs_diff_eq!(mode, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pair.peak().unwrap(), pair.base.max().unwrap(), epsilon = 1e-6);
    }
}
