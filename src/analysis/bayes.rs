//! Bayesian inference over Beta-distributed conversion rates.
//!
//! The model is Beta-Bernoulli conjugate: a Beta prior on each variant's
//! conversion probability is updated with the observed conversion counts,
//! and decision quantities (probability of being best, expected loss) are
//! estimated by Monte Carlo over the joint posterior.
//!
//! All sampling is generic over [`rand::Rng`] so callers inject their own
//! source; [`seeded_rng`] gives a deterministic `Xoshiro256PlusPlus` for
//! reproducible runs and tests.

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::numerics::incomplete_beta;
use crate::result::{BayesianResult, ConfidenceInterval};
use crate::types::{BetaDistribution, VariantAggregate};

/// Default number of Monte Carlo draws per decision quantity.
pub const DEFAULT_MONTE_CARLO_SAMPLES: usize = 10_000;

/// Hard cap on caller-supplied Monte Carlo sample counts.
///
/// The Monte Carlo loops are the only expensive operations in the engine;
/// this bound keeps a single evaluation's latency predictable.
pub const MAX_MONTE_CARLO_SAMPLES: usize = 1_000_000;

/// Iteration cap for the credible-interval bisection search.
const QUANTILE_MAX_ITER: usize = 100;

/// Convergence tolerance for the credible-interval bisection search.
const QUANTILE_TOL: f64 = 1e-6;

/// Attempt cap for Jöhnk rejection sampling before falling back to the
/// Gamma-ratio path.
const JOHNK_MAX_ATTEMPTS: usize = 1_000;

/// Deterministic RNG seeded for reproducible analysis runs.
pub fn seeded_rng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Conjugate Beta-Bernoulli posterior update.
///
/// With a `Beta(prior_alpha, prior_beta)` prior and `successes` conversions
/// out of `successes + failures` trials, the posterior is
/// `Beta(prior_alpha + successes, prior_beta + failures)`.
pub fn posterior_beta(
    successes: u64,
    failures: u64,
    prior_alpha: f64,
    prior_beta: f64,
) -> BetaDistribution {
    BetaDistribution::new(
        prior_alpha + successes as f64,
        prior_beta + failures as f64,
    )
}

/// Draw one sample from a Beta distribution.
///
/// When both shape parameters are at most 1 the density can be sampled
/// directly with Jöhnk rejection; otherwise two independent Gamma draws
/// (Marsaglia-Tsang) give `X / (X + Y)`.
pub fn sample_beta<R: Rng + ?Sized>(dist: &BetaDistribution, rng: &mut R) -> f64 {
    let (alpha, beta) = (dist.alpha, dist.beta);

    if alpha <= 1.0 && beta <= 1.0 {
        for _ in 0..JOHNK_MAX_ATTEMPTS {
            let u: f64 = rng.random();
            let v: f64 = rng.random();
            let x = u.powf(1.0 / alpha);
            let y = v.powf(1.0 / beta);
            let s = x + y;
            if s > 0.0 && s <= 1.0 {
                return x / s;
            }
        }
        // Pathological shapes; the Gamma path below handles them too.
    }

    let x = sample_gamma(alpha, rng);
    let y = sample_gamma(beta, rng);
    if x + y == 0.0 {
        return 0.5;
    }
    x / (x + y)
}

/// Draw one sample from a `Gamma(shape, 1)` distribution.
///
/// Marsaglia-Tsang squeeze method. Shapes below 1 use the boost
/// `Gamma(shape + 1) * U^(1/shape)`.
fn sample_gamma<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> f64 {
    if shape < 1.0 {
        let u: f64 = rng.random();
        return sample_gamma(shape + 1.0, rng) * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();

    loop {
        let x: f64 = StandardNormal.sample(rng);
        let v = (1.0 + c * x).powi(3);
        if v <= 0.0 {
            continue;
        }

        let u: f64 = rng.random();
        let x2 = x * x;

        // Squeeze check avoids the logarithm most of the time.
        if u < 1.0 - 0.0331 * x2 * x2 {
            return d * v;
        }
        if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

/// Monte Carlo estimate of P(variant i has the highest rate) per variant.
///
/// One sample per variant per round; the argmax tally is normalized by the
/// round count, so the output sums to 1 up to Monte Carlo error. Ties break
/// toward the first-encountered index. `samples` is clamped to
/// [`MAX_MONTE_CARLO_SAMPLES`].
pub fn probability_best<R: Rng + ?Sized>(
    distributions: &[BetaDistribution],
    samples: usize,
    rng: &mut R,
) -> Vec<f64> {
    if distributions.is_empty() {
        return Vec::new();
    }

    let samples = samples.min(MAX_MONTE_CARLO_SAMPLES).max(1);
    let mut wins = vec![0u64; distributions.len()];

    for _ in 0..samples {
        let mut best_idx = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, dist) in distributions.iter().enumerate() {
            let draw = sample_beta(dist, rng);
            if draw > best_value {
                best_value = draw;
                best_idx = i;
            }
        }
        wins[best_idx] += 1;
    }

    wins.iter().map(|&w| w as f64 / samples as f64).collect()
}

/// Monte Carlo expected loss from committing to one variant.
///
/// The mean of `max(0, max_other_sample - this_variant_sample)` across
/// rounds: how much conversion rate is given up, in expectation, if the
/// chosen variant is not actually the best.
pub fn expected_loss<R: Rng + ?Sized>(
    distributions: &[BetaDistribution],
    variant_index: usize,
    samples: usize,
    rng: &mut R,
) -> f64 {
    if variant_index >= distributions.len() || distributions.len() < 2 {
        return 0.0;
    }

    let samples = samples.min(MAX_MONTE_CARLO_SAMPLES).max(1);
    let mut total_loss = 0.0;

    for _ in 0..samples {
        let mut this_draw = 0.0;
        let mut max_other = f64::NEG_INFINITY;
        for (i, dist) in distributions.iter().enumerate() {
            let draw = sample_beta(dist, rng);
            if i == variant_index {
                this_draw = draw;
            } else if draw > max_other {
                max_other = draw;
            }
        }
        total_loss += (max_other - this_draw).max(0.0);
    }

    total_loss / samples as f64
}

/// Equal-tailed credible interval from the Beta posterior.
///
/// Each bound is a posterior quantile found by bisection over the
/// regularized incomplete beta CDF on `[0, 1]`, tolerance 1e-6. The search
/// returns its best estimate if the iteration cap is reached.
pub fn credible_interval(dist: &BetaDistribution, level: f64) -> ConfidenceInterval {
    let tail = (1.0 - level) / 2.0;
    ConfidenceInterval {
        lower: beta_quantile(tail, dist.alpha, dist.beta),
        upper: beta_quantile(1.0 - tail, dist.alpha, dist.beta),
        level,
    }
}

/// Beta distribution quantile via bisection on the CDF.
fn beta_quantile(p: f64, alpha: f64, beta: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut mid = 0.5;

    for _ in 0..QUANTILE_MAX_ITER {
        mid = (lo + hi) / 2.0;
        if incomplete_beta(mid, alpha, beta) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < QUANTILE_TOL {
            break;
        }
    }

    mid
}

/// Full Bayesian analysis of an experiment's variants.
///
/// Builds each variant's posterior and reports probability-of-best,
/// posterior mean, credible interval (at 95%), and expected loss.
pub fn analyze_bayesian<R: Rng + ?Sized>(
    variants: &[VariantAggregate],
    prior_alpha: f64,
    prior_beta: f64,
    samples: usize,
    rng: &mut R,
) -> Vec<BayesianResult> {
    let posteriors: Vec<BetaDistribution> = variants
        .iter()
        .map(|v| {
            posterior_beta(
                v.conversions,
                v.impressions - v.conversions,
                prior_alpha,
                prior_beta,
            )
        })
        .collect();

    let best_probabilities = probability_best(&posteriors, samples, rng);

    variants
        .iter()
        .zip(posteriors.iter())
        .enumerate()
        .map(|(i, (variant, posterior))| BayesianResult {
            variant_id: variant.id.clone(),
            probability_best: best_probabilities[i],
            posterior_mean: posterior.mean(),
            credible_interval: credible_interval(posterior, 0.95),
            expected_loss: expected_loss(&posteriors, i, samples, rng),
        })
        .collect()
}

/// [`analyze_bayesian`] with the uniform `Beta(1, 1)` prior and
/// [`DEFAULT_MONTE_CARLO_SAMPLES`] draws.
pub fn analyze_bayesian_default<R: Rng + ?Sized>(
    variants: &[VariantAggregate],
    rng: &mut R,
) -> Vec<BayesianResult> {
    analyze_bayesian(variants, 1.0, 1.0, DEFAULT_MONTE_CARLO_SAMPLES, rng)
}
