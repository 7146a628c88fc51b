/*!
Target and proposal distributions used by the density curves and the sampler.

This module is generic over the floating-point precision (e.g., `f32` or `f64`) using
the [`num_traits::Float`] trait.

# Examples

```rust
use tempered_density::distributions::{Normal, Normalized, Target, Tempered};

let normal = Normal::<f64>::standard();
let density = normal.pdf(0.0);
assert!((density - 0.3989422804014327).abs() < 1e-12);

// Raising the density to the power 1/2 widens it by a factor sqrt(2).
let tempered = Tempered::new(normal, 0.5).unwrap();
assert!((tempered.as_normal().std - 2f64.sqrt()).abs() < 1e-12);
assert_eq!(tempered.unnorm_log_prob(&[2.0]), 0.5 * normal.unnorm_log_prob(&[2.0]));
```
*/

use num_traits::Float;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal as NormalSampler};
use std::f64::consts::PI;

use crate::error::{DensityError, Result};

/// A trait for generating proposals in Metropolis–Hastings or similar algorithms.
pub trait Proposal<T: Float> {
    /// Samples a new point from q(x' | x).
    fn sample(&mut self, current: &[T]) -> Vec<T>;

    /// Evaluates log q(x' | x).
    fn log_prob(&self, from: &[T], to: &[T]) -> T;

    /// Returns a new instance of this proposal distribution seeded with `seed`.
    fn set_seed(self, seed: u64) -> Self;
}

/// A trait for continuous target distributions from which we want to sample.
pub trait Target<T: Float> {
    /// Returns the log of the unnormalized density for state `theta`.
    fn unnorm_log_prob(&self, theta: &[T]) -> T;
}

/// A trait for distributions that provide a normalized log-density.
pub trait Normalized<T: Float> {
    /// Returns the normalized log-density for state `theta`.
    fn log_prob(&self, theta: &[T]) -> T;
}

fn cast<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// A univariate normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal<T: Float> {
    pub mean: T,
    pub std: T,
}

impl<T: Float> Normal<T> {
    pub fn new(mean: T, std: T) -> Self {
        Self { mean, std }
    }

    /// The normal with mean 0 and standard deviation 1.
    pub fn standard() -> Self {
        Self::new(T::zero(), T::one())
    }

    /// Density at `x`.
    pub fn pdf(&self, x: T) -> T {
        self.log_prob(&[x]).exp()
    }
}

impl<T: Float> Normalized<T> for Normal<T> {
    /// -0.5 log(2 pi) - log(std) - 0.5 ((x - mean) / std)^2
    fn log_prob(&self, theta: &[T]) -> T {
        let half = cast::<T>(0.5);
        -half * cast::<T>(2.0 * PI).ln() - self.std.ln() + self.unnorm_log_prob(theta)
    }
}

impl<T: Float> Target<T> for Normal<T> {
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        let z = (theta[0] - self.mean) / self.std;
        -cast::<T>(0.5) * z * z
    }
}

/**
A density raised to the power `beta`, the inverse temperature.

`beta < 1` flattens the inner density, `beta > 1` sharpens it. Only the unnormalized
log-density is available in general; for a normal inner density the tempered density
is again normal (see [`Tempered::as_normal`]).
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempered<D, T: Float> {
    pub inner: D,
    pub beta: T,
}

impl<D, T: Float> Tempered<D, T> {
    pub fn new(inner: D, beta: T) -> Result<Self> {
        if !beta.is_finite() || beta <= T::zero() {
            return Err(DensityError::InvalidTemperature(
                beta.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(Self { inner, beta })
    }
}

impl<D: Target<T>, T: Float> Target<T> for Tempered<D, T> {
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        self.beta * self.inner.unnorm_log_prob(theta)
    }
}

impl<T: Float> Tempered<Normal<T>, T> {
    /// N(mean, std)^beta is proportional to N(mean, std / sqrt(beta)).
    pub fn as_normal(&self) -> Normal<T> {
        Normal::new(self.inner.mean, self.inner.std / self.beta.sqrt())
    }
}

impl<T: Float> Normalized<T> for Tempered<Normal<T>, T> {
    fn log_prob(&self, theta: &[T]) -> T {
        self.as_normal().log_prob(theta)
    }
}

/**
An isotropic Gaussian random-walk proposal.

Adds independent Gaussian noise with mean 0 and standard deviation `std` to each
coordinate of the current state.

```rust
use tempered_density::distributions::{IsotropicGaussian, Proposal};

let mut proposal: IsotropicGaussian<f64> = IsotropicGaussian::new(1.0).set_seed(7);
let candidate = proposal.sample(&[0.0]);
assert_eq!(candidate.len(), 1);
```
*/
#[derive(Debug, Clone)]
pub struct IsotropicGaussian<T: Float> {
    pub std: T,
    rng: SmallRng,
}

impl<T: Float> IsotropicGaussian<T> {
    pub fn new(std: T) -> Self {
        Self {
            std,
            rng: SmallRng::from_entropy(),
        }
    }
}

impl<T: Float> Proposal<T> for IsotropicGaussian<T>
where
    rand_distr::StandardNormal: Distribution<T>,
{
    fn sample(&mut self, current: &[T]) -> Vec<T> {
        let noise = NormalSampler::new(T::zero(), self.std)
            .expect("Expecting creation of normal distribution to succeed.");
        current
            .iter()
            .map(|&x| x + noise.sample(&mut self.rng))
            .collect()
    }

    fn log_prob(&self, from: &[T], to: &[T]) -> T {
        let var = self.std * self.std;
        let two = cast::<T>(2.0);
        let d = cast::<T>(from.len() as f64);
        let sq: T = from
            .iter()
            .zip(to)
            .fold(T::zero(), |acc, (&f, &t)| acc + (t - f) * (t - f));
        -sq / (two * var) - d * cast::<T>(0.5) * (two * cast::<T>(PI) * var).ln()
    }

    fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}
