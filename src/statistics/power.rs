//! Sample-size and power calculators for two-proportion experiments.

use crate::numerics::{normal_cdf, normal_quantile};

/// Minimum per-variant sample size to detect a relative effect.
///
/// Classic two-proportion formula: with baseline rate `p1`, treatment rate
/// `p2 = p1 * (1 + effect_size)` and pooled rate `p̄ = (p1 + p2) / 2`,
///
/// ```text
/// n = (z_{α/2} sqrt(2 p̄ (1 - p̄)) + z_β sqrt(p1(1-p1) + p2(1-p2)))² / (p2 - p1)²
/// ```
///
/// Returns `+∞` for degenerate inputs: baseline outside `(0, 1)`,
/// non-positive effect, or a derived treatment rate at or above 1.
pub fn minimum_sample_size(baseline: f64, effect_size: f64, alpha: f64, power: f64) -> f64 {
    if baseline <= 0.0 || baseline >= 1.0 || effect_size <= 0.0 {
        return f64::INFINITY;
    }

    let p1 = baseline;
    let p2 = baseline * (1.0 + effect_size);
    if p2 >= 1.0 {
        return f64::INFINITY;
    }

    let z_alpha = normal_quantile(1.0 - alpha / 2.0);
    let z_beta = normal_quantile(power);
    let p_bar = (p1 + p2) / 2.0;

    let pooled_term = z_alpha * (2.0 * p_bar * (1.0 - p_bar)).sqrt();
    let unpooled_term = z_beta * (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();
    let numerator = (pooled_term + unpooled_term).powi(2);
    let denominator = (p2 - p1).powi(2);

    (numerator / denominator).ceil()
}

/// Power achieved by a fixed per-variant sample size.
///
/// Inverts [`minimum_sample_size`]: solves for `z_β` at the given `n` and
/// returns `Φ(z_β)`. Returns 0 for degenerate inputs.
pub fn estimate_power(baseline: f64, effect_size: f64, n: u64, alpha: f64) -> f64 {
    if baseline <= 0.0 || baseline >= 1.0 || effect_size <= 0.0 || n == 0 {
        return 0.0;
    }

    let p1 = baseline;
    let p2 = baseline * (1.0 + effect_size);
    if p2 >= 1.0 {
        return 0.0;
    }

    let z_alpha = normal_quantile(1.0 - alpha / 2.0);
    let p_bar = (p1 + p2) / 2.0;
    let n = n as f64;

    let z_beta = ((p2 - p1) * n.sqrt() - z_alpha * (2.0 * p_bar * (1.0 - p_bar)).sqrt())
        / (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();

    normal_cdf(z_beta)
}
