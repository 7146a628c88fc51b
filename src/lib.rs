pub mod config;
pub mod core;
pub mod density;
pub mod distributions;
pub mod error;
pub mod grid;
pub mod io;
pub mod metropolis_hastings;
pub mod plot;
pub mod stats;

pub use config::PlotConfig;
pub use density::{DensityCurve, DensityPair};
pub use error::{DensityError, Result};
pub use grid::Grid;
