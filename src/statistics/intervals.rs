//! Confidence intervals for binomial proportions, differences, and lift.

use crate::numerics::z_for_level;
use crate::result::ConfidenceInterval;

/// Wilson score interval for a binomial proportion.
///
/// More accurate than the normal approximation at small samples or extreme
/// rates. Returns a `{0, 0}` interval when `total == 0`. Bounds are clamped
/// to `[0, 1]`.
pub fn wilson_score_interval(successes: u64, total: u64, level: f64) -> ConfidenceInterval {
    if total == 0 {
        return ConfidenceInterval::zero(level);
    }

    let n = total as f64;
    let p = successes as f64 / n;
    let z = z_for_level(level);
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt() / denom;

    ConfidenceInterval {
        lower: (center - margin).max(0.0),
        upper: (center + margin).min(1.0),
        level,
    }
}

/// Normal-approximation interval on the difference `p1 - p2`.
///
/// Uses the pooled standard error: the two samples are combined into one
/// rate `p̂ = (p1·n1 + p2·n2) / (n1 + n2)` and the variance is
/// `p̂(1 - p̂)(1/n1 + 1/n2)`. Returns a `{0, 0}` interval when either
/// sample size is 0.
pub fn proportion_difference_interval(
    p1: f64,
    n1: u64,
    p2: f64,
    n2: u64,
    level: f64,
) -> ConfidenceInterval {
    if n1 == 0 || n2 == 0 {
        return ConfidenceInterval::zero(level);
    }

    let z = z_for_level(level);
    let diff = p1 - p2;
    let (n1, n2) = (n1 as f64, n2 as f64);
    let pooled = (p1 * n1 + p2 * n2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();

    ConfidenceInterval {
        lower: diff - z * se,
        upper: diff + z * se,
        level,
    }
}

/// Interval on the relative lift `(variant - control) / control`.
///
/// The variance comes from the delta method: both proportions' variances
/// combined and scaled by `1 / control^2` (the variant term directly, the
/// control term additionally by `variant^2 / control^2`). Returns a `{0, 0}`
/// interval when the control rate is 0 or either sample size is 0.
pub fn lift_interval(
    variant_rate: f64,
    variant_n: u64,
    control_rate: f64,
    control_n: u64,
    level: f64,
) -> ConfidenceInterval {
    if control_rate == 0.0 || variant_n == 0 || control_n == 0 {
        return ConfidenceInterval::zero(level);
    }

    let z = z_for_level(level);
    let lift = (variant_rate - control_rate) / control_rate;

    let var_variant = variant_rate * (1.0 - variant_rate) / variant_n as f64;
    let var_control = control_rate * (1.0 - control_rate) / control_n as f64;
    let c2 = control_rate * control_rate;
    let variance = var_variant / c2 + variant_rate * variant_rate * var_control / (c2 * c2);
    let se = variance.sqrt();

    ConfidenceInterval {
        lower: lift - z * se,
        upper: lift + z * se,
        level,
    }
}

/// Whether two intervals overlap: `a.lower <= b.upper && b.lower <= a.upper`.
pub fn intervals_overlap(a: &ConfidenceInterval, b: &ConfidenceInterval) -> bool {
    a.overlaps(b)
}
