//! Settings for computing, sampling and rendering the density curves.
//!
//! [`PlotConfig::default`] reproduces the fixed chart: standard normal on
//! `[-10, 10)` every 0.1, square-root tempering, 1200x900 pixels.

use std::path::PathBuf;

use crate::error::{DensityError, Result};
use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
    /// Inverse temperature applied to the base density for the second curve.
    pub beta: f64,
    pub width: u32,
    pub height: u32,
    pub caption: String,
    pub output: PathBuf,
    pub n_chains: usize,
    /// Samples kept per chain after burn-in.
    pub n_collect: usize,
    pub n_discard: usize,
    pub proposal_std: f64,
    pub seed: u64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            start: -10.0,
            stop: 10.0,
            step: 0.1,
            beta: 0.5,
            width: 1200,
            height: 900,
            caption: "Standard normal and tempered density".to_string(),
            output: PathBuf::from("densities.svg"),
            n_chains: 4,
            n_collect: 25_000,
            n_discard: 2_000,
            proposal_std: 2.0,
            seed: 42,
        }
    }
}

impl PlotConfig {
    pub fn with_grid(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.start = start;
        self.stop = stop;
        self.step = step;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_sampler(mut self, n_chains: usize, n_collect: usize, n_discard: usize) -> Self {
        self.n_chains = n_chains;
        self.n_collect = n_collect;
        self.n_discard = n_discard;
        self
    }

    pub fn with_proposal_std(mut self, proposal_std: f64) -> Self {
        self.proposal_std = proposal_std;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the evaluation grid described by this configuration.
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.start, self.stop, self.step)
    }

    /// Checks every setting without computing anything.
    pub fn validate(&self) -> Result<()> {
        self.grid()?;
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(DensityError::InvalidTemperature(self.beta));
        }
        if self.width == 0 || self.height == 0 {
            return Err(DensityError::Plot(format!(
                "chart size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.n_chains == 0 || self.n_collect == 0 {
            return Err(DensityError::InvalidSampler(
                "expected at least one chain and one collected sample".to_string(),
            ));
        }
        if !self.proposal_std.is_finite() || self.proposal_std <= 0.0 {
            return Err(DensityError::InvalidSampler(format!(
                "proposal standard deviation must be positive, got {}",
                self.proposal_std
            )));
        }
        Ok(())
    }
}
