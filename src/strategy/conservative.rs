//! Conservative strategy: immediate selection plus a confirmation period.

use crate::config::{ExperimentConfig, StrategyKind};
use crate::result::WinnerCandidate;
use crate::types::VariantAggregate;

use super::{Immediate, WinnerStrategy};

/// Sample multiplier every variant must reach before a candidate is
/// confirmed.
const CONFIRMATION_FACTOR: f64 = 1.5;

/// Delegates to [`Immediate`] and then demands half again the minimum
/// sample size before confirming.
///
/// A candidate found before the confirmation floor is returned with
/// `meets_threshold == false` so callers can surface "winner emerging,
/// waiting for confirmation" without acting on it.
pub struct Conservative;

impl WinnerStrategy for Conservative {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Conservative
    }

    fn evaluate(
        &self,
        variants: &[VariantAggregate],
        config: &ExperimentConfig,
    ) -> Option<WinnerCandidate> {
        let mut candidate = Immediate.evaluate(variants, config)?;

        let confirmation_floor =
            (config.minimum_sample_size as f64 * CONFIRMATION_FACTOR).ceil() as u64;
        let confirmed = variants.iter().all(|v| v.impressions >= confirmation_floor);

        if !confirmed {
            candidate.meets_threshold = false;
            candidate.reasoning = format!(
                "{} leads, but waiting for confirmation: every variant needs {} impressions \
                 ({}x the minimum sample size)",
                candidate.variant_name, confirmation_floor, CONFIRMATION_FACTOR
            );
        }

        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExperimentConfig {
        ExperimentConfig::new()
            .strategy(StrategyKind::Conservative)
            .significance_level(0.95)
            .minimum_sample_size(100)
    }

    #[test]
    fn confirms_past_the_floor() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 1000, 100).control(),
            VariantAggregate::new("b", "Variant", 1000, 150),
        ];
        let winner = Conservative.evaluate(&variants, &config()).unwrap();
        assert!(winner.meets_threshold);
    }

    #[test]
    fn waits_for_confirmation_below_floor() {
        // Clear separation at exactly the minimum sample size: Immediate
        // would confirm, Conservative wants 150 impressions per variant.
        let variants = vec![
            VariantAggregate::new("a", "Control", 100, 5).control(),
            VariantAggregate::new("b", "Variant", 100, 30),
        ];
        let candidate = Conservative.evaluate(&variants, &config()).unwrap();
        assert!(!candidate.meets_threshold);
        assert!(candidate.reasoning.contains("confirmation"));
        assert_eq!(candidate.variant_id, "b");
    }

    #[test]
    fn no_candidate_without_separation() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 1000, 100).control(),
            VariantAggregate::new("b", "Variant", 1000, 105),
        ];
        assert!(Conservative.evaluate(&variants, &config()).is_none());
    }
}
