//! Winner-selection strategies.
//!
//! Each strategy is one decision policy over the same inputs: the variant
//! aggregates and the experiment configuration. The closed set of policies
//! lives in [`StrategyKind`](crate::config::StrategyKind); dispatch goes
//! through a registry of trait objects built once at first use and treated
//! as immutable afterwards.

mod conservative;
mod economic;
mod immediate;
mod safety_first;

use std::collections::BTreeMap;
use std::sync::OnceLock;

pub use conservative::Conservative;
pub use economic::{Economic, VALUE_GAIN_FACTOR};
pub use immediate::Immediate;
pub use safety_first::SafetyFirst;

use crate::config::{ExperimentConfig, StrategyKind};
use crate::result::WinnerCandidate;
use crate::types::VariantAggregate;

/// A winner-selection policy.
///
/// `evaluate` returns `None` when no leading variant can be named at all
/// (for example, sample floors unmet), and `Some` with
/// `meets_threshold == false` when a leader exists but the policy is not
/// willing to confirm it yet.
pub trait WinnerStrategy: Send + Sync {
    /// Which registry slot this strategy occupies.
    fn kind(&self) -> StrategyKind;

    /// Evaluate the variants under this policy.
    fn evaluate(
        &self,
        variants: &[VariantAggregate],
        config: &ExperimentConfig,
    ) -> Option<WinnerCandidate>;
}

/// The process-wide strategy registry.
///
/// Built once on first access; read-only afterwards. Every [`StrategyKind`]
/// has exactly one entry.
pub(crate) fn registry() -> &'static BTreeMap<StrategyKind, Box<dyn WinnerStrategy>> {
    static REGISTRY: OnceLock<BTreeMap<StrategyKind, Box<dyn WinnerStrategy>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let strategies: [Box<dyn WinnerStrategy>; 4] = [
            Box::new(Immediate),
            Box::new(Conservative),
            Box::new(Economic),
            Box::new(SafetyFirst),
        ];
        strategies.into_iter().map(|s| (s.kind(), s)).collect()
    })
}

/// The control variant: the first flagged `is_control`, else the first
/// variant in input order.
pub(crate) fn control_variant(variants: &[VariantAggregate]) -> Option<&VariantAggregate> {
    variants.iter().find(|v| v.is_control).or_else(|| variants.first())
}

/// Relative lift of a rate over the control's rate; 0 when the control rate
/// is 0.
pub(crate) fn lift_over_control(rate: f64, control_rate: f64) -> f64 {
    if control_rate == 0.0 {
        0.0
    } else {
        (rate - control_rate) / control_rate
    }
}

/// Variants sorted by conversion rate, highest first, stable for ties.
pub(crate) fn by_rate_descending(variants: &[VariantAggregate]) -> Vec<&VariantAggregate> {
    let mut sorted: Vec<&VariantAggregate> = variants.iter().collect();
    sorted.sort_by(|a, b| b.conversion_rate().total_cmp(&a.conversion_rate()));
    sorted
}
