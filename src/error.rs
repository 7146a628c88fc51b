//! Error type shared by the grid, density, sampler and rendering code.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DensityError>;

#[derive(Error, Debug)]
pub enum DensityError {
    #[error("invalid grid: start={start}, stop={stop}, step={step}")]
    InvalidGrid { start: f64, stop: f64, step: f64 },
    #[error("inverse temperature must be finite and positive, got {0}")]
    InvalidTemperature(f64),
    #[error("cannot normalize curve `{label}`: Riemann sum is {sum}")]
    DegenerateNormalizer { label: String, sum: f64 },
    #[error("curve length {curve} does not match grid length {grid}")]
    LengthMismatch { curve: usize, grid: usize },
    #[error("invalid sampler setting: {0}")]
    InvalidSampler(String),
    #[error("chart rendering failed: {0}")]
    Plot(String),
    #[error("statistics failed: {0}")]
    Stats(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
