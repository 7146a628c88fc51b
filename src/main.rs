//! Computes the standard normal density and its square-root tempered version on the
//! default grid, draws samples from the tempered target, and charts all three.

use std::error::Error;

use tempered_density::core::ChainRunner;
use tempered_density::distributions::{IsotropicGaussian, Normal, Proposal, Tempered};
use tempered_density::metropolis_hastings::MetropolisHastings;
use tempered_density::plot::render_to_file;
use tempered_density::stats::{rhat, sample_mean, sample_variance, Histogram};
use tempered_density::{DensityPair, PlotConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PlotConfig::default();
    config.validate()?;

    let pair = DensityPair::from_config(&config)?;
    let mode = pair.grid.point(pair.base.argmax()?);
    log::info!(
        "base: integral {:.6}, max {:.4} at x = {mode:.1}",
        pair.base.integral(pair.grid.step()),
        pair.base.max()?
    );
    log::info!(
        "tempered (beta = {}): integral {:.6}, normalizer {:.6}",
        pair.beta,
        pair.tempered.integral(pair.grid.step()),
        pair.normalizer
    );

    let target = Tempered::new(Normal::<f64>::standard(), config.beta)?;
    let proposal = IsotropicGaussian::new(config.proposal_std).set_seed(config.seed);
    let mut mh =
        MetropolisHastings::new(target, proposal, &[0.0], config.n_chains).set_seed(config.seed);
    let samples = mh.run_progress(config.n_collect, config.n_discard)?;

    let flat: Vec<f64> = samples.iter().copied().collect();
    log::info!(
        "sampled {} draws: mean {:.3}, variance {:.3} (exact {:.3})",
        flat.len(),
        sample_mean(&flat),
        sample_variance(&flat),
        target.as_normal().std.powi(2)
    );
    log::info!("acceptance rates: {:?}", mh.acceptance_rates());
    if config.n_chains > 1 {
        log::info!("R-hat: {:.4}", rhat(&samples)?[0]);
    }

    let hist = Histogram::from_samples(&pair.grid, &flat);
    if hist.dropped() > 0 {
        log::warn!("{} draws fell outside the grid", hist.dropped());
    }
    let overlay = hist.density("MH samples")?;
    render_to_file(&pair, Some(&overlay), &config)?;

    #[cfg(feature = "csv")]
    tempered_density::io::csv::save_curves(&pair, "densities.csv")?;

    Ok(())
}
