//! One-way ANOVA over variant conversion rates.
//!
//! Each variant's conversion rate is treated as a binomial proportion. The
//! within-group sum of squares deliberately uses the binomial variance
//! `n * p * (1 - p)` rather than an empirical sample variance: the inputs
//! are aggregate counters, so the per-observation variance is known from
//! the rate itself. Pairwise follow-ups are two-proportion z-tests with a
//! Bonferroni-corrected threshold.

use crate::numerics::{incomplete_beta, normal_cdf};
use crate::result::{AnovaResult, BestVariant, PairwiseComparison};
use crate::types::VariantAggregate;

/// One-way ANOVA across all variants.
///
/// With fewer than 2 variants (or no within-group degrees of freedom) a
/// neutral non-significant result is returned rather than an error.
pub fn one_way_anova(variants: &[VariantAggregate], alpha: f64) -> AnovaResult {
    let k = variants.len();
    if k < 2 {
        return AnovaResult::neutral();
    }

    let total_n: u64 = variants.iter().map(|v| v.impressions).sum();
    let total_conversions: u64 = variants.iter().map(|v| v.conversions).sum();
    if total_n == 0 {
        return AnovaResult::neutral();
    }

    let grand_rate = total_conversions as f64 / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for v in variants {
        let n = v.impressions as f64;
        let p = v.conversion_rate();
        ss_between += n * (p - grand_rate).powi(2);
        ss_within += n * p * (1.0 - p);
    }

    let df_between = (k - 1) as f64;
    let df_within = total_n as f64 - k as f64;
    if df_within <= 0.0 {
        return AnovaResult::neutral();
    }

    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    let f_statistic = if ms_within == 0.0 {
        0.0
    } else {
        ms_between / ms_within
    };

    let p_value = f_distribution_p_value(f_statistic, df_between, df_within);

    AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        is_significant: p_value < alpha,
    }
}

/// Upper-tail p-value of the F distribution.
///
/// `P(F > f)` via the incomplete beta transform
/// `I_x(df2/2, df1/2)` with `x = df2 / (df2 + df1 * f)`.
fn f_distribution_p_value(f: f64, df1: f64, df2: f64) -> f64 {
    if f <= 0.0 {
        return 1.0;
    }
    let x = df2 / (df2 + df1 * f);
    incomplete_beta(x, df2 / 2.0, df1 / 2.0).clamp(0.0, 1.0)
}

/// All `k(k-1)/2` pairwise two-proportion z-tests.
///
/// Each pair's significance is judged against the Bonferroni-corrected
/// threshold `alpha / num_comparisons`. Pairs where either variant has zero
/// impressions are skipped.
pub fn pairwise_comparisons(
    variants: &[VariantAggregate],
    alpha: f64,
) -> Vec<PairwiseComparison> {
    let k = variants.len();
    if k < 2 {
        return Vec::new();
    }

    let num_comparisons = (k * (k - 1) / 2) as f64;
    let corrected_alpha = alpha / num_comparisons;

    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let a = &variants[i];
            let b = &variants[j];
            if a.impressions == 0 || b.impressions == 0 {
                continue;
            }

            let n_a = a.impressions as f64;
            let n_b = b.impressions as f64;
            let pooled = (a.conversions + b.conversions) as f64 / (n_a + n_b);
            let se = (pooled * (1.0 - pooled) * (1.0 / n_a + 1.0 / n_b)).sqrt();

            let z = if se == 0.0 {
                0.0
            } else {
                (a.conversion_rate() - b.conversion_rate()) / se
            };
            let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));

            comparisons.push(PairwiseComparison {
                variant_a: a.id.clone(),
                variant_b: b.id.clone(),
                z_statistic: z,
                p_value,
                is_significant: p_value < corrected_alpha,
            });
        }
    }

    comparisons
}

/// The variant with the highest conversion rate, plus the variants it beats
/// at the Bonferroni-corrected level.
///
/// Ties break toward the first-encountered variant. Returns `None` for an
/// empty slice.
pub fn identify_best_variant(
    variants: &[VariantAggregate],
    alpha: f64,
) -> Option<BestVariant> {
    let best = variants.iter().reduce(|best, v| {
        if v.conversion_rate() > best.conversion_rate() {
            v
        } else {
            best
        }
    })?;

    let significantly_beats = pairwise_comparisons(variants, alpha)
        .into_iter()
        .filter(|c| c.is_significant)
        .filter_map(|c| {
            if c.variant_a == best.id {
                Some(c.variant_b)
            } else if c.variant_b == best.id {
                Some(c.variant_a)
            } else {
                None
            }
        })
        .collect();

    Some(BestVariant {
        variant_id: best.id.clone(),
        conversion_rate: best.conversion_rate(),
        significantly_beats,
    })
}
