//! Summaries of sampler output: moments, a histogram on the density grid, and R-hat.

use ndarray::{Array1, Array3, Axis};

use crate::density::DensityCurve;
use crate::error::{DensityError, Result};
use crate::grid::Grid;

pub fn sample_mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Unbiased sample variance.
pub fn sample_variance(xs: &[f64]) -> f64 {
    let m = sample_mean(xs);
    xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() as f64 - 1.0)
}

/// Sample counts per grid cell `[x_i, x_i + step)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    grid: Grid,
    counts: Array1<u64>,
    /// Samples that fell outside the grid.
    dropped: u64,
}

impl Histogram {
    pub fn from_samples<'a>(grid: &Grid, samples: impl IntoIterator<Item = &'a f64>) -> Self {
        let mut counts = Array1::<u64>::zeros(grid.len());
        let mut dropped = 0;
        for &x in samples {
            match grid.cell_of(x) {
                Some(i) => counts[i] += 1,
                None => dropped += 1,
            }
        }
        Self {
            grid: grid.clone(),
            counts,
            dropped,
        }
    }

    pub fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Counts divided by `total * step`, i.e. a density that integrates to 1 over the grid.
    pub fn density(&self, label: impl Into<String>) -> Result<DensityCurve> {
        let total = self.total();
        if total == 0 {
            return Err(DensityError::Stats(
                "histogram has no samples inside the grid".to_string(),
            ));
        }
        let scale = total as f64 * self.grid.step();
        Ok(DensityCurve::new(
            label,
            self.counts.mapv(|c| c as f64 / scale),
        ))
    }
}

/**
Potential scale reduction factor (Gelman-Rubin R-hat) per dimension.

`samples` is shaped `(chains, draws, dim)`. Values close to 1 indicate that the chains
agree with each other.
*/
pub fn rhat(samples: &Array3<f64>) -> Result<Array1<f64>> {
    let (m, n, _) = samples.dim();
    if m < 2 || n < 2 {
        return Err(DensityError::Stats(format!(
            "R-hat needs at least 2 chains with 2 draws each, got {m} x {n}"
        )));
    }
    let n_f = n as f64;
    // (chains, dim)
    let chain_means = samples
        .mean_axis(Axis(1))
        .ok_or_else(|| DensityError::Stats("empty draws axis".to_string()))?;
    let chain_vars = samples.var_axis(Axis(1), 1.0);
    let within = chain_vars
        .mean_axis(Axis(0))
        .ok_or_else(|| DensityError::Stats("empty chains axis".to_string()))?;
    let between_over_n = chain_means.var_axis(Axis(0), 1.0);
    let var_hat = &within * ((n_f - 1.0) / n_f) + &between_over_n;
    Ok((var_hat / within).mapv(f64::sqrt))
}
