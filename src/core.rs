//! Chain stepping and the parallel runner shared by the samplers.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::{s, Array2, Array3, Axis};
use rayon::prelude::*;
use std::error::Error;

pub trait MarkovChain<S> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> &Vec<S>;

    /// The current state without stepping.
    fn current_state(&self) -> &Vec<S>;
}

/// Steps `chain` `n_steps` times and returns the visited states, one per row.
pub fn run_chain<S, M>(chain: &mut M, n_steps: usize) -> Array2<S>
where
    M: MarkovChain<S>,
    S: Clone + num_traits::Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));
    for mut row in out.axis_iter_mut(Axis(0)) {
        let state = chain.step();
        row.iter_mut()
            .zip(state.iter())
            .for_each(|(o, s)| *o = s.clone());
    }
    out
}

pub fn run_chain_with_progress<S, M>(chain: &mut M, n_steps: usize, pb: &ProgressBar) -> Array2<S>
where
    M: MarkovChain<S>,
    S: Clone + num_traits::Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));
    pb.set_length(n_steps as u64);
    for mut row in out.axis_iter_mut(Axis(0)) {
        let state = chain.step();
        row.iter_mut()
            .zip(state.iter())
            .for_each(|(o, s)| *o = s.clone());
        pb.inc(1);
    }
    out
}

/// Anything that owns multiple [`MarkovChain`]s.
pub trait HasChains<S> {
    type Chain: MarkovChain<S> + Send;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<S>: HasChains<S>
where
    S: Clone + num_traits::Zero + Send + Sync + PartialEq + std::fmt::Debug + 'static,
{
    /// Runs every chain for `n_discard + n_collect` steps in parallel and returns the
    /// kept samples shaped `(chains, n_collect, dim)`.
    fn run(&mut self, n_collect: usize, n_discard: usize) -> Result<Array3<S>, Box<dyn Error>> {
        let results: Vec<Array2<S>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_discard + n_collect))
            .collect();
        stack_chains(results, n_discard)
    }

    /// Same as [`ChainRunner::run`] with one progress bar per chain.
    fn run_progress(
        &mut self,
        n_collect: usize,
        n_discard: usize,
    ) -> Result<Array3<S>, Box<dyn Error>> {
        let n_steps = n_discard + n_collect;
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-");

        let results: Vec<Array2<S>> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(n_steps as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());
                let samples = run_chain_with_progress(chain, n_steps, &pb);
                pb.finish_with_message("Done!");
                samples
            })
            .collect();
        stack_chains(results, n_discard)
    }
}

fn stack_chains<S: Clone>(
    results: Vec<Array2<S>>,
    n_discard: usize,
) -> Result<Array3<S>, Box<dyn Error>> {
    let kept: Vec<_> = results
        .iter()
        .map(|samples| samples.slice(s![n_discard.., ..]))
        .collect();
    Ok(ndarray::stack(Axis(0), &kept)?)
}

impl<S, T> ChainRunner<S> for T
where
    S: Clone + num_traits::Zero + Send + Sync + PartialEq + std::fmt::Debug + 'static,
    T: HasChains<S>,
{
}
