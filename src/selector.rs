//! Winner selection dispatch, strategy recommendation, configuration
//! validation, and time-constraint checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ExperimentConfig, StrategyKind};
use crate::error::EngineError;
use crate::result::{TimeConstraintStatus, WinnerCandidate};
use crate::strategy::registry;
use crate::types::VariantAggregate;

/// SafetyFirst demands at least this many impressions as the configured
/// minimum.
const SAFETY_FIRST_SAMPLE_FLOOR: u64 = 100;

/// Economic strategy is only recommended above this expected sample size.
const ECONOMIC_SAMPLE_THRESHOLD: u64 = 500;

/// Evaluate the configured strategy against the variants.
///
/// Fewer than 2 variants is a soft condition and yields `Ok(None)`. A
/// strategy kind missing from the registry is a configuration or
/// programming defect and raises [`EngineError::UnknownStrategy`].
pub fn select_winner(
    variants: &[VariantAggregate],
    config: &ExperimentConfig,
) -> Result<Option<WinnerCandidate>, EngineError> {
    if variants.len() < 2 {
        return Ok(None);
    }

    let strategy = registry()
        .get(&config.strategy)
        .ok_or(EngineError::UnknownStrategy(config.strategy))?;

    Ok(strategy.evaluate(variants, config))
}

/// How fast the experimenter wants a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DesiredSpeed {
    /// Take a winner as soon as the statistics allow.
    Fast,
    /// Prefer confirmation over speed.
    #[default]
    Careful,
}

/// Inputs to the strategy recommendation heuristic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RecommendationContext {
    /// Mistakes are costly (pricing, checkout, compliance surfaces).
    pub is_high_stakes: bool,
    /// Variants carry monetary value worth optimizing directly.
    pub has_economic_value: bool,
    /// Expected per-variant sample size.
    pub expected_sample_size: u64,
    /// Speed/rigor preference.
    pub desired_speed: DesiredSpeed,
}

/// Deterministic strategy recommendation.
///
/// High stakes always wins; economic value needs enough traffic to matter;
/// otherwise the speed preference decides between Immediate and the
/// Conservative default.
pub fn recommend_strategy(context: &RecommendationContext) -> StrategyKind {
    if context.is_high_stakes {
        StrategyKind::SafetyFirst
    } else if context.has_economic_value
        && context.expected_sample_size >= ECONOMIC_SAMPLE_THRESHOLD
    {
        StrategyKind::Economic
    } else if context.desired_speed == DesiredSpeed::Fast {
        StrategyKind::Immediate
    } else {
        StrategyKind::Conservative
    }
}

/// A single violated configuration constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigViolation {
    /// Name of the offending field.
    pub field: &'static str,
    /// What the constraint requires.
    pub message: String,
}

/// Check a configuration without panicking, aggregating every violation.
///
/// An empty vector means the configuration is valid. Callers can report
/// all problems at once instead of fixing them one at a time.
pub fn validate_winner_config(config: &ExperimentConfig) -> Vec<ConfigViolation> {
    let mut violations = Vec::new();

    if config.significance_level <= 0.0 || config.significance_level >= 1.0 {
        violations.push(ConfigViolation {
            field: "significance_level",
            message: format!(
                "must be in (0, 1), got {}",
                config.significance_level
            ),
        });
    }

    if config.minimum_sample_size < 10 {
        violations.push(ConfigViolation {
            field: "minimum_sample_size",
            message: format!("must be at least 10, got {}", config.minimum_sample_size),
        });
    }

    if config.strategy == StrategyKind::SafetyFirst
        && config.minimum_sample_size < SAFETY_FIRST_SAMPLE_FLOOR
    {
        violations.push(ConfigViolation {
            field: "minimum_sample_size",
            message: format!(
                "safety_first requires at least {SAFETY_FIRST_SAMPLE_FLOOR}, got {}",
                config.minimum_sample_size
            ),
        });
    }

    violations
}

/// Evaluate duration constraints against the current wall clock.
pub fn check_time_constraints(
    started_at: DateTime<Utc>,
    min_duration_days: Option<f64>,
    max_duration_days: Option<f64>,
) -> TimeConstraintStatus {
    check_time_constraints_at(started_at, min_duration_days, max_duration_days, Utc::now())
}

/// Evaluate duration constraints against an explicit `now`.
///
/// Split out so tests and replay tooling can pin the clock.
pub fn check_time_constraints_at(
    started_at: DateTime<Utc>,
    min_duration_days: Option<f64>,
    max_duration_days: Option<f64>,
    now: DateTime<Utc>,
) -> TimeConstraintStatus {
    let elapsed_days = (now - started_at).num_seconds() as f64 / 86_400.0;

    if let Some(min_days) = min_duration_days {
        if elapsed_days < min_days {
            return TimeConstraintStatus {
                elapsed_days,
                is_ready: false,
                should_force_selection: false,
                reasoning: format!(
                    "only {elapsed_days:.1} of the minimum {min_days:.1} days have elapsed"
                ),
            };
        }
    }

    if let Some(max_days) = max_duration_days {
        if elapsed_days >= max_days {
            return TimeConstraintStatus {
                elapsed_days,
                is_ready: true,
                should_force_selection: true,
                reasoning: format!(
                    "maximum duration of {max_days:.1} days reached after {elapsed_days:.1}"
                ),
            };
        }
    }

    TimeConstraintStatus {
        elapsed_days,
        is_ready: true,
        should_force_selection: false,
        reasoning: "within duration constraints".to_string(),
    }
}
