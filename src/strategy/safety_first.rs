//! Safety-first strategy: maximum rigor before committing to a winner.

use crate::config::{ExperimentConfig, StrategyKind};
use crate::result::WinnerCandidate;
use crate::statistics::{lift_interval, wilson_score_interval};
use crate::types::VariantAggregate;

use super::{by_rate_descending, control_variant, lift_over_control, WinnerStrategy};

/// Confidence level used regardless of configuration.
const SAFETY_LEVEL: f64 = 0.99;

/// Sample multiplier applied to `minimum_sample_size`.
const SAMPLE_FACTOR: u64 = 2;

/// The most demanding policy: double sample floor, fixed 99% confidence,
/// and a strictly positive lift lower bound.
///
/// Requirements:
/// 1. Every variant has at least `2 * minimum_sample_size` impressions.
/// 2. The best variant's 99% interval clears the runner-up's.
/// 3. The 99% interval on the lift versus control has a lower bound above 0.
///
/// When a leader exists but a check fails, the candidate is returned with
/// `meets_threshold == false` and the failed check named.
pub struct SafetyFirst;

impl WinnerStrategy for SafetyFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SafetyFirst
    }

    fn evaluate(
        &self,
        variants: &[VariantAggregate],
        config: &ExperimentConfig,
    ) -> Option<WinnerCandidate> {
        let required = config.minimum_sample_size * SAMPLE_FACTOR;
        if variants.iter().any(|v| v.impressions < required) {
            return None;
        }

        let ranked = by_rate_descending(variants);
        let best = ranked.first()?;
        let second = ranked.get(1)?;
        let control = control_variant(variants)?;

        let best_ci = wilson_score_interval(best.conversions, best.impressions, SAFETY_LEVEL);
        let second_ci =
            wilson_score_interval(second.conversions, second.impressions, SAFETY_LEVEL);
        let separated = best_ci.lower > second_ci.upper;

        let lift = lift_over_control(best.conversion_rate(), control.conversion_rate());
        let lift_ci = lift_interval(
            best.conversion_rate(),
            best.impressions,
            control.conversion_rate(),
            control.impressions,
            SAFETY_LEVEL,
        );
        let lift_positive = best.id != control.id && lift_ci.lower > 0.0;

        let meets_threshold = separated && lift_positive;
        let reasoning = if meets_threshold {
            format!(
                "{} confirmed at 99% confidence: intervals separated and lift lower bound \
                 {:.4} > 0",
                best.name, lift_ci.lower
            )
        } else if !separated {
            format!(
                "{} leads, but its 99% interval still overlaps the runner-up's",
                best.name
            )
        } else {
            format!(
                "{} leads, but the 99% lift interval includes zero (lower bound {:.4})",
                best.name, lift_ci.lower
            )
        };

        Some(WinnerCandidate {
            variant_id: best.id.clone(),
            variant_name: best.name.clone(),
            conversion_rate: best.conversion_rate(),
            confidence_interval: best_ci,
            lift,
            total_value: Some(best.total_value),
            meets_threshold,
            reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExperimentConfig {
        ExperimentConfig::new()
            .strategy(StrategyKind::SafetyFirst)
            .significance_level(0.95) // Ignored: the strategy pins 99%.
            .minimum_sample_size(100)
    }

    #[test]
    fn confirms_overwhelming_evidence() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 5000, 500).control(),
            VariantAggregate::new("b", "Variant", 5000, 900),
        ];
        let winner = SafetyFirst.evaluate(&variants, &config()).unwrap();
        assert!(winner.meets_threshold);
        assert_eq!(winner.confidence_interval.level, SAFETY_LEVEL);
        assert!((winner.lift - 0.8).abs() < 1e-9);
    }

    #[test]
    fn doubled_sample_floor_blocks() {
        // 150 impressions each clears minimum_sample_size = 100 but not the
        // doubled floor of 200.
        let variants = vec![
            VariantAggregate::new("a", "Control", 150, 15).control(),
            VariantAggregate::new("b", "Variant", 150, 45),
        ];
        assert!(SafetyFirst.evaluate(&variants, &config()).is_none());
    }

    #[test]
    fn marginal_separation_is_not_confirmed() {
        // Separates at 95% but not at the pinned 99% level.
        let variants = vec![
            VariantAggregate::new("a", "Control", 1000, 100).control(),
            VariantAggregate::new("b", "Variant", 1000, 135),
        ];
        let candidate = SafetyFirst.evaluate(&variants, &config()).unwrap();
        assert!(!candidate.meets_threshold);
        assert!(candidate.reasoning.contains("overlaps"));
    }
}
