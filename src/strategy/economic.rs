//! Economic strategy: rank by value per impression, not conversion rate.

use crate::config::{ExperimentConfig, StrategyKind};
use crate::result::WinnerCandidate;
use crate::statistics::wilson_score_interval;
use crate::types::VariantAggregate;

use super::{control_variant, WinnerStrategy};

/// Heuristic multiplier on `minimum_sample_size` defining the required
/// total value gain.
///
/// A winner must bring at least `VALUE_GAIN_FACTOR * minimum_sample_size`
/// in total value over the control. This is a tuning constant, not a
/// statistical law.
pub const VALUE_GAIN_FACTOR: f64 = 0.1;

/// Selects the variant with the highest average value per impression.
///
/// Confirmation requires both an economically meaningful total value gain
/// (see [`VALUE_GAIN_FACTOR`]) and Wilson-interval non-overlap on the
/// conversion rate versus the control. A leader failing either check is
/// returned unconfirmed with the failing check named in the reasoning.
pub struct Economic;

impl WinnerStrategy for Economic {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Economic
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

        let best = variants
            .iter()
            .reduce(|best, v| {
                if v.value_per_impression() > best.value_per_impression() {
                    v
                } else {
                    best
                }
            })?;
        let control = control_variant(variants)?;

        let control_vpi = control.value_per_impression();
        let economic_lift = if control_vpi == 0.0 {
            0.0
        } else {
            (best.value_per_impression() - control_vpi) / control_vpi
        };

        let total_value_gain = best.total_value - control.total_value;
        let required_gain = VALUE_GAIN_FACTOR * config.minimum_sample_size as f64;
        let gain_ok = total_value_gain >= required_gain;

        let best_ci =
            wilson_score_interval(best.conversions, best.impressions, config.significance_level);
        let control_ci = wilson_score_interval(
            control.conversions,
            control.impressions,
            config.significance_level,
        );
        // Separation on rate is required in addition to the value gain; the
        // best variant may be the control itself, which trivially overlaps.
        let rate_separated = best.id != control.id && !best_ci.overlaps(&control_ci);

        let meets_threshold = gain_ok && rate_separated;
        let reasoning = if meets_threshold {
            format!(
                "{} earns {:.4} per impression ({:+.1}% vs control) with a total value gain \
                 of {:.2} and statistically separated conversion rates",
                best.name,
                best.value_per_impression(),
                economic_lift * 100.0,
                total_value_gain
            )
        } else if !gain_ok {
            format!(
                "{} leads on value per impression but the total value gain {:.2} is below \
                 the required {:.2}",
                best.name, total_value_gain, required_gain
            )
        } else {
            format!(
                "{} leads on value per impression but its conversion-rate interval still \
                 overlaps the control's",
                best.name
            )
        };

        Some(WinnerCandidate {
            variant_id: best.id.clone(),
            variant_name: best.name.clone(),
            conversion_rate: best.conversion_rate(),
            confidence_interval: best_ci,
            lift: economic_lift,
            total_value: Some(best.total_value),
            meets_threshold,
            reasoning,
        })
    }
}
