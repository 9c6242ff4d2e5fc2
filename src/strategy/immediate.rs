//! Immediate strategy: declare a winner as soon as intervals separate.

use crate::config::{ExperimentConfig, StrategyKind};
use crate::result::WinnerCandidate;
use crate::statistics::wilson_score_interval;
use crate::types::VariantAggregate;

use super::{by_rate_descending, control_variant, lift_over_control, WinnerStrategy};

/// Declares a winner the moment the best variant's confidence interval
/// clears the runner-up's.
///
/// Requirements:
/// 1. Every variant has at least `minimum_sample_size` impressions.
/// 2. The best variant's Wilson lower bound exceeds the second-best
///    variant's upper bound (non-overlap rule) at the configured level.
pub struct Immediate;

impl WinnerStrategy for Immediate {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Immediate
    }

    fn evaluate(
        &self,
        variants: &[VariantAggregate],
        config: &ExperimentConfig,
    ) -> Option<WinnerCandidate> {
        if variants
            .iter()
            .any(|v| v.impressions < config.minimum_sample_size)
        {
            return None;
        }

        let ranked = by_rate_descending(variants);
        let best = ranked.first()?;
        let second = ranked.get(1)?;

        let best_ci =
            wilson_score_interval(best.conversions, best.impressions, config.significance_level);
        let second_ci = wilson_score_interval(
            second.conversions,
            second.impressions,
            config.significance_level,
        );

        if best_ci.lower <= second_ci.upper {
            return None;
        }

        let control = control_variant(variants)?;
        let lift = lift_over_control(best.conversion_rate(), control.conversion_rate());

        Some(WinnerCandidate {
            variant_id: best.id.clone(),
            variant_name: best.name.clone(),
            conversion_rate: best.conversion_rate(),
            confidence_interval: best_ci,
            lift,
            total_value: Some(best.total_value),
            meets_threshold: true,
            reasoning: format!(
                "{} leads with {:.2}% conversion; its {:.0}% confidence interval does not \
                 overlap the runner-up's ({:.4} > {:.4})",
                best.name,
                best.conversion_rate() * 100.0,
                config.significance_level * 100.0,
                best_ci.lower,
                second_ci.upper
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExperimentConfig {
        ExperimentConfig::new()
            .strategy(StrategyKind::Immediate)
            .significance_level(0.95)
            .minimum_sample_size(100)
    }

    #[test]
    fn clear_separation_wins() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 1000, 100).control(),
            VariantAggregate::new("b", "Variant", 1000, 150),
        ];
        let winner = Immediate.evaluate(&variants, &config()).unwrap();
        assert_eq!(winner.variant_id, "b");
        assert!(winner.meets_threshold);
        assert!((winner.lift - 0.5).abs() < 1e-9);
    }

    #[test]
    fn overlapping_intervals_yield_none() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 1000, 100).control(),
            VariantAggregate::new("b", "Variant", 1000, 110),
        ];
        assert!(Immediate.evaluate(&variants, &config()).is_none());
    }

    #[test]
    fn sample_floor_blocks_evaluation() {
        let variants = vec![
            VariantAggregate::new("a", "Control", 50, 5).control(),
            VariantAggregate::new("b", "Variant", 1000, 150),
        ];
        assert!(Immediate.evaluate(&variants, &config()).is_none());
    }

    #[test]
    fn lift_is_computed_against_flagged_control() {
        // Control is listed second; lift must still use it as the baseline.
        let variants = vec![
            VariantAggregate::new("b", "Variant", 1000, 200),
            VariantAggregate::new("a", "Control", 1000, 100).control(),
        ];
        let winner = Immediate.evaluate(&variants, &config()).unwrap();
        assert_eq!(winner.variant_id, "b");
        assert!((winner.lift - 1.0).abs() < 1e-9);
    }
}
