//! One-dimensional random sequences `<X_1, ..., X_n>` of independent draws.
//!
//! Each element is `process(d)` where `d` comes from a base distribution.
//! With the default standard normal base and identity process this is white
//! noise. Every call to [`StochasticProcess::generate`] draws a new sequence
//! from the owned generator, so a seeded process is reproducible.

use std::f64::consts::TAU;

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, StandardNormal};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseDistribution {
    StandardNormal,
    Exponential { lambda: f64 },
}

enum Sampler {
    Normal,
    Exponential(Exp<f64>),
}

impl Sampler {
    fn new(distribution: BaseDistribution) -> Result<Sampler> {
        match distribution {
            BaseDistribution::StandardNormal => Ok(Sampler::Normal),
            BaseDistribution::Exponential { lambda } => Exp::new(lambda)
                .map(Sampler::Exponential)
                .map_err(|e| Error::InvalidConfig(format!("exponential rate {lambda}: {e}"))),
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            Sampler::Normal => StandardNormal.sample(rng),
            Sampler::Exponential(exp) => exp.sample(rng),
        }
    }
}

pub struct StochasticProcess {
    len: usize,
    distribution: BaseDistribution,
    sampler: Sampler,
    process: Box<dyn Fn(f64) -> f64 + Send + Sync>,
    rng: StdRng,
}

impl StochasticProcess {
    /// White noise process of `len` elements.
    pub fn new(len: usize) -> Result<StochasticProcess> {
        Self::with_distribution(len, |x| x, BaseDistribution::StandardNormal)
    }

    /// Standard normal draws passed through `process`.
    pub fn with_process<F>(len: usize, process: F) -> Result<StochasticProcess>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::with_distribution(len, process, BaseDistribution::StandardNormal)
    }

    pub fn with_distribution<F>(
        len: usize,
        process: F,
        distribution: BaseDistribution,
    ) -> Result<StochasticProcess>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        if len == 0 {
            return Err(Error::InvalidConfig(
                "a stochastic process needs at least one element".to_owned(),
            ));
        }
        Ok(StochasticProcess {
            len,
            distribution,
            sampler: Sampler::new(distribution)?,
            process: Box::new(process),
            rng: StdRng::from_entropy(),
        })
    }

    /// Reseed the generator, for repeatable sequences.
    pub fn seeded(mut self, seed: u64) -> StochasticProcess {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn distribution(&self) -> BaseDistribution {
        self.distribution
    }

    pub fn generate(&mut self) -> DVector<f64> {
        let sampler = &self.sampler;
        let process = &self.process;
        let rng = &mut self.rng;
        DVector::from_fn(self.len, |_, _| process(sampler.sample(rng)))
    }
}

pub fn mean(x: &DVector<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.mean()
}

/// Population variance, mean of squared deviations.
pub fn variance(x: &DVector<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let m = x.mean();
    x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / x.len() as f64
}

/// Mean of squares, the average power of the sequence.
pub fn output_power(x: &DVector<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.norm_squared() / x.len() as f64
}

/// One-sided periodogram `|X_k|^2 / n` for bins `0..=n/2`, with `X` the
/// discrete Fourier transform of `x` evaluated directly.
pub fn power_spectral_density(x: &DVector<f64>) -> DVector<f64> {
    let n = x.len();
    if n == 0 {
        return DVector::zeros(0);
    }
    DVector::from_fn(n / 2 + 1, |k, _| {
        let (re, im) = x.iter().enumerate().fold((0.0, 0.0), |(re, im), (i, v)| {
            let phase = -TAU * (k * i % n) as f64 / n as f64;
            (re + v * phase.cos(), im + v * phase.sin())
        });
        (re * re + im * im) / n as f64
    })
}

/// Mean over a trailing window, shorter at the start of the sequence.
pub fn moving_mean(x: &DVector<f64>, window: usize) -> DVector<f64> {
    let window = window.max(1);
    DVector::from_fn(x.len(), |i, _| {
        let start = (i + 1).saturating_sub(window);
        let slice = x.rows(start, i + 1 - start);
        slice.sum() / slice.len() as f64
    })
}

/// Standard deviation over a trailing window, shorter at the start of the sequence.
pub fn moving_std(x: &DVector<f64>, window: usize) -> DVector<f64> {
    let window = window.max(1);
    DVector::from_fn(x.len(), |i, _| {
        let start = (i + 1).saturating_sub(window);
        let slice = x.rows(start, i + 1 - start);
        let n = slice.len() as f64;
        let m = slice.sum() / n;
        (slice.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n).sqrt()
    })
}

/// Biased autocorrelation of the centred sequence for lags `0..=max_lag`,
/// normalized so that lag 0 is 1.
pub fn auto_correlation(x: &DVector<f64>, max_lag: usize) -> DVector<f64> {
    let n = x.len();
    let max_lag = max_lag.min(n.saturating_sub(1));
    if n == 0 {
        return DVector::zeros(0);
    }
    let m = x.mean();
    let centred = x.map(|v| v - m);
    let c0 = centred.dot(&centred);
    DVector::from_fn(max_lag + 1, |lag, _| {
        if c0 == 0.0 {
            return if lag == 0 { 1.0 } else { 0.0 };
        }
        let c = (0..n - lag).map(|i| centred[i] * centred[i + lag]).sum::<f64>();
        c / c0
    })
}
