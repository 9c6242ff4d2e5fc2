//! Result types produced by the decision engine.
//!
//! Everything here is plain data: the engine performs no I/O, and calling
//! code decides what to persist. All types serialize with serde so callers
//! can ship them to storage or reporting as-is.

use serde::{Deserialize, Serialize};

/// A two-sided confidence (or credible) interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound, clamped to the parameter's domain.
    pub lower: f64,
    /// Upper bound, clamped to the parameter's domain.
    pub upper: f64,
    /// Confidence level the interval was built at, e.g. 0.95.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Interval with both bounds at zero, used for degenerate inputs.
    pub fn zero(level: f64) -> Self {
        Self {
            lower: 0.0,
            upper: 0.0,
            level,
        }
    }

    /// Whether this interval overlaps another.
    ///
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

/// A winner candidate produced by a selection strategy.
///
/// Constructed fresh per evaluation call; never persisted by the engine.
/// `meets_threshold == false` means the strategy found a leading variant but
/// is not willing to confirm it yet; `reasoning` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerCandidate {
    /// Identifier of the leading variant.
    pub variant_id: String,
    /// Name of the leading variant.
    pub variant_name: String,
    /// Observed conversion rate of the leading variant.
    pub conversion_rate: f64,
    /// Confidence interval on the leading variant's conversion rate.
    pub confidence_interval: ConfidenceInterval,
    /// Relative lift versus the control variant (signed).
    pub lift: f64,
    /// Accumulated value of the leading variant, when value tracking is on.
    pub total_value: Option<f64>,
    /// Whether the strategy's confirmation criteria are all satisfied.
    pub meets_threshold: bool,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Per-variant output of the Bayesian engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianResult {
    /// Identifier of the variant this row describes.
    pub variant_id: String,
    /// Monte Carlo estimate of P(this variant has the highest rate).
    pub probability_best: f64,
    /// Posterior mean conversion rate.
    pub posterior_mean: f64,
    /// Credible interval on the conversion rate.
    pub credible_interval: ConfidenceInterval,
    /// Expected loss (in rate units) from choosing this variant when a
    /// better one exists.
    pub expected_loss: f64,
}

/// Decision reached by the sequential probability ratio test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequentialDecision {
    /// Evidence favors the treatment; stop, the variant wins.
    StopVariantWins,
    /// Evidence favors no difference; stop the test.
    StopNoDifference,
    /// Not enough evidence either way; keep collecting.
    Continue,
}

/// Output of a sequential (SPRT) test evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialTestResult {
    /// Cumulative log-likelihood ratio.
    pub llr: f64,
    /// Upper stopping threshold `ln((1 - beta) / alpha)`.
    pub upper_bound: f64,
    /// Lower stopping threshold `ln(beta / (1 - alpha))`.
    pub lower_bound: f64,
    /// The decision implied by the thresholds.
    pub decision: SequentialDecision,
}

/// Output of a one-way ANOVA over variant conversion rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    /// F statistic (0 when the within-group mean square is 0).
    pub f_statistic: f64,
    /// p-value from the F distribution CDF.
    pub p_value: f64,
    /// Between-group degrees of freedom, `k - 1`.
    pub df_between: f64,
    /// Within-group degrees of freedom, `N - k`.
    pub df_within: f64,
    /// Whether `p_value < alpha`.
    pub is_significant: bool,
}

impl AnovaResult {
    /// Neutral non-significant result, returned for fewer than 2 variants.
    pub fn neutral() -> Self {
        Self {
            f_statistic: 0.0,
            p_value: 1.0,
            df_between: 0.0,
            df_within: 0.0,
            is_significant: false,
        }
    }
}

/// A single Bonferroni-corrected pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    /// First variant in the pair.
    pub variant_a: String,
    /// Second variant in the pair.
    pub variant_b: String,
    /// Two-proportion z statistic.
    pub z_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Whether `p_value` clears the Bonferroni-corrected threshold.
    pub is_significant: bool,
}

/// The best variant identified by the ANOVA engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestVariant {
    /// Identifier of the variant with the highest conversion rate.
    pub variant_id: String,
    /// Its observed conversion rate.
    pub conversion_rate: f64,
    /// Identifiers of variants it beats at the corrected significance level.
    pub significantly_beats: Vec<String>,
}

/// Readiness of an experiment with respect to its duration constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraintStatus {
    /// Days elapsed since the experiment started.
    pub elapsed_days: f64,
    /// Whether a winner may be declared at all.
    pub is_ready: bool,
    /// Whether the maximum duration has passed and selection must be forced.
    pub should_force_selection: bool,
    /// Human-readable explanation.
    pub reasoning: String,
}

/// Error entry recorded against one experiment during batch processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentError {
    /// Experiment the failure belongs to.
    pub experiment_id: String,
    /// Failure description.
    pub error: String,
}

/// Aggregate outcome of one auto-winner batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoWinnerResult {
    /// Experiments examined.
    pub total_checked: usize,
    /// Experiments completed with a winner this run.
    pub winners_selected: usize,
    /// Experiments left running.
    pub still_running: usize,
    /// Per-experiment failures, in processing order.
    pub errors: Vec<ExperimentError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let a = ConfidenceInterval {
            lower: 0.1,
            upper: 0.3,
            level: 0.95,
        };
        let b = ConfidenceInterval {
            lower: 0.25,
            upper: 0.5,
            level: 0.95,
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = ConfidenceInterval {
            lower: 0.31,
            upper: 0.4,
            level: 0.95,
        };
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn touching_intervals_overlap() {
        let a = ConfidenceInterval {
            lower: 0.1,
            upper: 0.2,
            level: 0.95,
        };
        let b = ConfidenceInterval {
            lower: 0.2,
            upper: 0.3,
            level: 0.95,
        };
        assert!(a.overlaps(&b));
    }

    #[test]
    fn neutral_anova_is_not_significant() {
        let r = AnovaResult::neutral();
        assert_eq!(r.f_statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert!(!r.is_significant);
    }

    #[test]
    fn winner_candidate_serializes() {
        let candidate = WinnerCandidate {
            variant_id: "b".into(),
            variant_name: "Variant B".into(),
            conversion_rate: 0.15,
            confidence_interval: ConfidenceInterval {
                lower: 0.13,
                upper: 0.17,
                level: 0.95,
            },
            lift: 0.5,
            total_value: None,
            meets_threshold: true,
            reasoning: "non-overlapping intervals".into(),
        };
        let json = serde_json::to_string(&candidate).unwrap();
        let back: WinnerCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, candidate);
    }
}
