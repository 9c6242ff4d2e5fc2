//! Sequential probability ratio testing (SPRT) with early stopping.
//!
//! Instead of fixing the sample size up front, the SPRT accumulates a
//! log-likelihood ratio between "treatment lifts the rate by `effect`" (H1)
//! and "both arms share one rate" (H0) and stops as soon as either Wald
//! threshold is crossed. Alpha-spending schedules bound the Type-I error
//! across interim looks.

use serde::{Deserialize, Serialize};

use crate::numerics::{normal_cdf, normal_quantile};
use crate::result::{SequentialDecision, SequentialTestResult};

/// Probabilities are clamped to this range before taking logarithms.
const RATE_CLAMP_MIN: f64 = 0.001;
const RATE_CLAMP_MAX: f64 = 0.999;

/// Alpha-spending schedule for interim looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphaSpendingMethod {
    /// O'Brien-Fleming: spends almost nothing early, nearly all at the end.
    OBrienFleming,
    /// Pocock: spends roughly evenly on a log schedule.
    Pocock,
    /// Linear in the information fraction.
    Linear,
}

fn clamp_rate(p: f64) -> f64 {
    p.clamp(RATE_CLAMP_MIN, RATE_CLAMP_MAX)
}

/// Log-likelihood ratio between H1 (relative `effect` exists) and H0 (one
/// shared rate).
///
/// The pooled rate `p̄ = (c0 + c1) / (n0 + n1)` is split under H1 into a
/// control rate `p0 = p̄ / (1 + effect)` and treatment rate
/// `p1 = p0 * (1 + effect)`. All rates are clamped to `[0.001, 0.999]`
/// before logs so empty or saturated arms cannot produce `log(0)`.
pub fn calculate_llr(c0: u64, n0: u64, c1: u64, n1: u64, effect: f64) -> f64 {
    if n0 == 0 || n1 == 0 {
        return 0.0;
    }

    let pooled = clamp_rate((c0 + c1) as f64 / (n0 + n1) as f64);
    let p0 = clamp_rate(pooled / (1.0 + effect));
    let p1 = clamp_rate(p0 * (1.0 + effect));

    let (c0, n0, c1, n1) = (c0 as f64, n0 as f64, c1 as f64, n1 as f64);

    let ll_h1 = c0 * p0.ln()
        + (n0 - c0) * (1.0 - p0).ln()
        + c1 * p1.ln()
        + (n1 - c1) * (1.0 - p1).ln();
    let ll_h0 =
        (c0 + c1) * pooled.ln() + (n0 + n1 - c0 - c1) * (1.0 - pooled).ln();

    ll_h1 - ll_h0
}

/// Evaluate the SPRT at the current counts.
///
/// Thresholds are Wald's: `upper = ln((1 - beta) / alpha)` and
/// `lower = ln(beta / (1 - alpha))`. Crossing the upper bound stops with a
/// winning variant; crossing the lower bound stops with no difference;
/// otherwise the test continues.
pub fn sequential_test(
    control_conversions: u64,
    control_n: u64,
    variant_conversions: u64,
    variant_n: u64,
    effect: f64,
    alpha: f64,
    beta: f64,
) -> SequentialTestResult {
    let llr = calculate_llr(
        control_conversions,
        control_n,
        variant_conversions,
        variant_n,
        effect,
    );
    let upper_bound = ((1.0 - beta) / alpha).ln();
    let lower_bound = (beta / (1.0 - alpha)).ln();

    let decision = if llr >= upper_bound {
        SequentialDecision::StopVariantWins
    } else if llr <= lower_bound {
        SequentialDecision::StopNoDifference
    } else {
        SequentialDecision::Continue
    };

    SequentialTestResult {
        llr,
        upper_bound,
        lower_bound,
        decision,
    }
}

/// Cumulative Type-I error allowed at information fraction `t`.
///
/// `t <= 0` spends nothing; `t >= 1` spends the full `alpha`.
pub fn alpha_spending(t: f64, alpha: f64, method: AlphaSpendingMethod) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return alpha;
    }

    match method {
        AlphaSpendingMethod::OBrienFleming => {
            let z = normal_quantile(1.0 - alpha / 2.0);
            2.0 * (1.0 - normal_cdf(z / t.sqrt()))
        }
        AlphaSpendingMethod::Pocock => {
            alpha * (1.0 + (std::f64::consts::E - 1.0) * t).ln()
        }
        AlphaSpendingMethod::Linear => alpha * t,
    }
}

/// Wald's average-sample-number approximation for the SPRT.
///
/// Expected per-arm sample size to reach a decision under H1:
/// `((1 - beta) * A + beta * B) / KL(p1 || p0)` where `A` and `B` are the
/// Wald thresholds and the divisor is the per-observation information.
/// Returns `+∞` for degenerate inputs (baseline outside `(0, 1)`,
/// non-positive effect, or a derived rate at or above 1).
pub fn estimate_sequential_sample_size(
    baseline: f64,
    effect: f64,
    alpha: f64,
    beta: f64,
) -> f64 {
    if baseline <= 0.0 || baseline >= 1.0 || effect <= 0.0 {
        return f64::INFINITY;
    }

    let p0 = baseline;
    let p1 = baseline * (1.0 + effect);
    if p1 >= 1.0 {
        return f64::INFINITY;
    }

    let a = ((1.0 - beta) / alpha).ln();
    let b = (beta / (1.0 - alpha)).ln();

    // Per-observation Kullback-Leibler information under H1.
    let kl = p1 * (p1 / p0).ln() + (1.0 - p1) * ((1.0 - p1) / (1.0 - p0)).ln();
    if kl <= 0.0 {
        return f64::INFINITY;
    }

    (((1.0 - beta) * a + beta * b) / kl).ceil()
}
