//! Experiment decision configuration.
//!
//! `ExperimentConfig` is immutable per evaluation call. Builder methods
//! assert on invalid values for programmatic use; callers that want to
//! report all problems at once should use
//! [`validate_winner_config`](crate::selector::validate_winner_config),
//! which aggregates violations into a list instead of panicking.

use serde::{Deserialize, Serialize};

/// The closed set of winner-selection policies.
///
/// Strategies are registered once at process start in a read-only registry;
/// dispatch happens through [`select_winner`](crate::selector::select_winner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Declare a winner as soon as confidence intervals separate.
    Immediate,
    /// Like `Immediate`, but waits for 1.5x the minimum sample size before
    /// confirming.
    Conservative,
    /// Ranks variants by average value per impression instead of raw
    /// conversion rate.
    Economic,
    /// Doubles the sample floor, fixes the confidence level at 99%, and
    /// additionally requires a strictly positive lift lower bound.
    SafetyFirst,
}

impl StrategyKind {
    /// Stable lowercase name used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Conservative => "conservative",
            Self::Economic => "economic",
            Self::SafetyFirst => "safety_first",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision configuration for a single experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Winner-selection policy to apply.
    pub strategy: StrategyKind,

    /// Confidence level for interval construction, in `(0, 1)`.
    ///
    /// Levels 0.90, 0.95, 0.99 and 0.999 map to exact z values; anything
    /// else falls back to the 95% critical value.
    pub significance_level: f64,

    /// Minimum impressions every variant must accumulate before a strategy
    /// will consider declaring a winner. Must be at least 10.
    pub minimum_sample_size: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Conservative,
            significance_level: 0.95,
            minimum_sample_size: 1_000,
        }
    }
}

impl ExperimentConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for rapid iteration: immediate selection with a small sample
    /// floor. Suitable for low-risk UI experiments.
    pub fn quick() -> Self {
        Self {
            strategy: StrategyKind::Immediate,
            significance_level: 0.95,
            minimum_sample_size: 100,
        }
    }

    /// Preset for typical product experiments.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Preset for high-stakes experiments: safety-first policy with a large
    /// sample floor.
    pub fn high_stakes() -> Self {
        Self {
            strategy: StrategyKind::SafetyFirst,
            significance_level: 0.99,
            minimum_sample_size: 5_000,
        }
    }

    /// Set the winner-selection strategy.
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the confidence level.
    pub fn significance_level(mut self, level: f64) -> Self {
        assert!(
            level > 0.0 && level < 1.0,
            "significance_level must be in (0, 1)"
        );
        self.significance_level = level;
        self
    }

    /// Set the minimum sample size.
    pub fn minimum_sample_size(mut self, size: u64) -> Self {
        assert!(size >= 10, "minimum_sample_size must be at least 10");
        self.minimum_sample_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.strategy, StrategyKind::Conservative);
        assert_eq!(config.significance_level, 0.95);
        assert_eq!(config.minimum_sample_size, 1_000);
    }

    #[test]
    fn preset_configs() {
        let quick = ExperimentConfig::quick();
        assert_eq!(quick.strategy, StrategyKind::Immediate);
        assert_eq!(quick.minimum_sample_size, 100);

        let high_stakes = ExperimentConfig::high_stakes();
        assert_eq!(high_stakes.strategy, StrategyKind::SafetyFirst);
        assert_eq!(high_stakes.significance_level, 0.99);
    }

    #[test]
    fn builder_methods() {
        let config = ExperimentConfig::new()
            .strategy(StrategyKind::Economic)
            .significance_level(0.99)
            .minimum_sample_size(250);

        assert_eq!(config.strategy, StrategyKind::Economic);
        assert_eq!(config.significance_level, 0.99);
        assert_eq!(config.minimum_sample_size, 250);
    }

    #[test]
    #[should_panic(expected = "significance_level must be in (0, 1)")]
    fn invalid_significance_level_panics() {
        let _ = ExperimentConfig::new().significance_level(1.0);
    }

    #[test]
    #[should_panic(expected = "minimum_sample_size must be at least 10")]
    fn tiny_sample_size_panics() {
        let _ = ExperimentConfig::new().minimum_sample_size(5);
    }

    #[test]
    fn strategy_names() {
        assert_eq!(StrategyKind::Immediate.as_str(), "immediate");
        assert_eq!(StrategyKind::SafetyFirst.to_string(), "safety_first");
    }
}
