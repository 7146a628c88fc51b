/*!
# Metropolis–Hastings Sampler

Random-walk Metropolis–Hastings over any [`Target`] with any [`Proposal`]. Several
independent chains are run in parallel from the same starting state. A global seed makes
runs reproducible: chain `i` is seeded with `seed + i`.

Drawing from a tempered standard normal:

```rust
use tempered_density::core::ChainRunner;
use tempered_density::distributions::{IsotropicGaussian, Normal, Tempered};
use tempered_density::metropolis_hastings::MetropolisHastings;

let target = Tempered::new(Normal::<f64>::standard(), 0.5).unwrap();
let proposal = IsotropicGaussian::new(2.0);
let mut mh = MetropolisHastings::new(target, proposal, &[0.0], 2).set_seed(42);
let samples = mh.run(500, 100).unwrap();
assert_eq!(samples.shape(), &[2, 500, 1]);
```
*/

use num_traits::Float;
use rand::prelude::*;
use std::marker::PhantomData;

use crate::core::{HasChains, MarkovChain};
use crate::distributions::{Proposal, Target};

/// Multi-chain Metropolis–Hastings sampler.
#[derive(Debug, Clone)]
pub struct MetropolisHastings<T: Float, D: Clone, Q: Clone> {
    pub target: D,
    pub proposal: Q,
    pub chains: Vec<MHMarkovChain<T, D, Q>>,
    /// The global random seed.
    pub seed: u64,
}

/// A single Metropolis–Hastings chain with its own copy of the target and proposal.
#[derive(Debug, Clone)]
pub struct MHMarkovChain<T, D, Q> {
    pub target: D,
    pub proposal: Q,
    pub current_state: Vec<T>,
    pub seed: u64,
    pub rng: SmallRng,
    n_steps: u64,
    n_accepted: u64,
    phantom: PhantomData<T>,
}

impl<T, D, Q> MetropolisHastings<T, D, Q>
where
    D: Target<T> + Clone + Send,
    Q: Proposal<T> + Clone + Send,
    T: Float + Send,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Creates `n_chains` chains that all start at `initial_state`.
    pub fn new(target: D, proposal: Q, initial_state: &[T], n_chains: usize) -> Self {
        let seed = thread_rng().gen::<u64>();
        let sampler = Self {
            chains: (0..n_chains)
                .map(|_| MHMarkovChain::new(target.clone(), proposal.clone(), initial_state))
                .collect(),
            target,
            proposal,
            seed,
        };
        sampler.set_seed(seed)
    }

    /// Reseeds every chain: chain `i` gets `seed + i`, for both its acceptance draws and
    /// its proposal.
    ///
    /// ```rust
    /// use tempered_density::distributions::{IsotropicGaussian, Normal};
    /// use tempered_density::metropolis_hastings::MetropolisHastings;
    ///
    /// let mh = MetropolisHastings::new(Normal::<f64>::standard(), IsotropicGaussian::new(1.0), &[0.0], 2)
    ///     .set_seed(42);
    /// assert_eq!(mh.chains[0].seed, 42);
    /// assert_eq!(mh.chains[1].seed, 43);
    /// ```
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        for (i, chain) in self.chains.iter_mut().enumerate() {
            let chain_seed = seed.wrapping_add(i as u64);
            chain.seed = chain_seed;
            chain.rng = SmallRng::seed_from_u64(chain_seed);
            chain.proposal = chain.proposal.clone().set_seed(chain_seed);
        }
        self
    }

    /// Fraction of accepted proposals per chain so far.
    pub fn acceptance_rates(&self) -> Vec<f64> {
        self.chains.iter().map(|c| c.acceptance_rate()).collect()
    }
}

impl<T, D, Q> HasChains<T> for MetropolisHastings<T, D, Q>
where
    D: Target<T> + Clone + Send,
    Q: Proposal<T> + Clone + Send,
    T: Float + Send,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    type Chain = MHMarkovChain<T, D, Q>;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}

impl<T, D, Q> MHMarkovChain<T, D, Q>
where
    D: Target<T> + Clone,
    Q: Proposal<T> + Clone,
    T: Float,
{
    pub fn new(target: D, proposal: Q, initial_state: &[T]) -> Self {
        let seed = thread_rng().gen::<u64>();
        Self {
            target,
            proposal,
            current_state: initial_state.to_vec(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            n_steps: 0,
            n_accepted: 0,
            phantom: PhantomData,
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.n_steps == 0 {
            0.0
        } else {
            self.n_accepted as f64 / self.n_steps as f64
        }
    }
}

impl<T, D, Q> MarkovChain<T> for MHMarkovChain<T, D, Q>
where
    D: Target<T> + Clone,
    Q: Proposal<T> + Clone,
    T: Float,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /**
    One Metropolis–Hastings update. The candidate is accepted when

    log u < [log p(x') + log q(x | x')] - [log p(x) + log q(x' | x)],  u ~ Uniform(0, 1).
    */
    fn step(&mut self) -> &Vec<T> {
        let proposed = self.proposal.sample(&self.current_state);
        let current_lp = self.target.unnorm_log_prob(&self.current_state);
        let proposed_lp = self.target.unnorm_log_prob(&proposed);
        let log_q_forward = self.proposal.log_prob(&self.current_state, &proposed);
        let log_q_backward = self.proposal.log_prob(&proposed, &self.current_state);
        let log_accept_ratio = (proposed_lp + log_q_backward) - (current_lp + log_q_forward);
        let u: T = self.rng.gen();
        self.n_steps += 1;
        if log_accept_ratio > u.ln() {
            self.current_state = proposed;
            self.n_accepted += 1;
        }
        &self.current_state
    }

    fn current_state(&self) -> &Vec<T> {
        &self.current_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChainRunner;
    use crate::distributions::{IsotropicGaussian, Normal, Tempered};
    use crate::stats::{sample_mean, sample_variance};
    use approx::assert_abs_diff_eq;

    fn run_tempered_test(beta: f64, n_collect: usize, n_chains: usize, use_progress: bool) {
        const BURNIN: usize = 1_000;
        const SEED: u64 = 42;

        let target = Tempered::new(Normal::<f64>::standard(), beta).unwrap();
        let proposal = IsotropicGaussian::new(2.0);
        let mut mh = MetropolisHastings::new(target, proposal, &[0.0], n_chains).set_seed(SEED);

        let samples = if use_progress {
            mh.run_progress(n_collect, BURNIN).unwrap()
        } else {
            mh.run(n_collect, BURNIN).unwrap()
        };
        assert_eq!(samples.shape(), &[n_chains, n_collect, 1]);

        let flat: Vec<f64> = samples.iter().copied().collect();
        assert_abs_diff_eq!(sample_mean(&flat), 0.0, epsilon = 0.15);
        assert_abs_diff_eq!(sample_variance(&flat), 1.0 / beta, epsilon = 0.25 / beta);
    }

    #[test]
    fn half_tempered_single_chain() {
        run_tempered_test(0.5, 20_000, 1, false);
    }

    #[test]
    fn half_tempered_4_chains() {
        run_tempered_test(0.5, 10_000, 4, false);
    }

    #[test]
    fn untempered_progress_4_chains() {
        run_tempered_test(1.0, 10_000, 4, true);
    }

    #[test]
    fn seeded_runs_repeat() {
        let make = || {
            let proposal = IsotropicGaussian::new(1.0);
            MetropolisHastings::new(Normal::<f64>::standard(), proposal, &[0.0], 2).set_seed(9)
        };
        let a = make().run(200, 10).unwrap();
        let b = make().run(200, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn acceptance_is_tracked() {
        let mut chain = MHMarkovChain::new(
            Normal::<f64>::standard(),
            IsotropicGaussian::new(1.0).set_seed(1),
            &[0.0],
        );
        assert_eq!(chain.acceptance_rate(), 0.0);
        for _ in 0..2_000 {
            chain.step();
        }
        let rate = chain.acceptance_rate();
        assert!(rate > 0.3 && rate < 0.95, "unexpected acceptance rate {rate}");
    }

    #[test]
    fn runs_without_burn_in() {
        let proposal = IsotropicGaussian::new(1.0);
        let mut mh =
            MetropolisHastings::new(Normal::<f64>::standard(), proposal, &[50.0], 3).set_seed(3);
        let samples = mh.run(100, 0).unwrap();
        assert_eq!(samples.shape(), &[3, 100, 1]);
        assert_eq!(mh.acceptance_rates().len(), 3);
    }
}
