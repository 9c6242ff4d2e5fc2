//! Core data types consumed and produced by the decision engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;

/// Per-variant aggregate counters, as maintained by the event-tracking layer.
///
/// The engine treats this as a read-only snapshot; only external event
/// tracking mutates the counters. Invariant: `conversions <= impressions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAggregate {
    /// Stable variant identifier.
    pub id: String,
    /// Human-readable variant name.
    pub name: String,
    /// Number of trials (visitors exposed to this variant).
    pub impressions: u64,
    /// Number of successes. Must not exceed `impressions`.
    pub conversions: u64,
    /// Accumulated monetary value attributed to this variant.
    pub total_value: f64,
    /// Whether this variant is the control arm.
    pub is_control: bool,
}

impl VariantAggregate {
    /// Create a new aggregate snapshot.
    ///
    /// # Panics
    ///
    /// Panics if `conversions > impressions`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        impressions: u64,
        conversions: u64,
    ) -> Self {
        assert!(
            conversions <= impressions,
            "conversions must not exceed impressions"
        );
        Self {
            id: id.into(),
            name: name.into(),
            impressions,
            conversions,
            total_value: 0.0,
            is_control: false,
        }
    }

    /// Mark this variant as the control arm.
    pub fn control(mut self) -> Self {
        self.is_control = true;
        self
    }

    /// Attach accumulated value to this variant.
    pub fn with_value(mut self, total_value: f64) -> Self {
        self.total_value = total_value;
        self
    }

    /// Observed conversion rate, or 0 when no impressions were recorded.
    pub fn conversion_rate(&self) -> f64 {
        if self.impressions == 0 {
            0.0
        } else {
            self.conversions as f64 / self.impressions as f64
        }
    }

    /// Average value per impression, or 0 when no impressions were recorded.
    pub fn value_per_impression(&self) -> f64 {
        if self.impressions == 0 {
            0.0
        } else {
            self.total_value / self.impressions as f64
        }
    }
}

/// Beta distribution parameters for a per-variant conversion-rate posterior.
///
/// Ephemeral: derived from counters per evaluation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaDistribution {
    /// Shape parameter alpha (prior alpha + successes).
    pub alpha: f64,
    /// Shape parameter beta (prior beta + failures).
    pub beta: f64,
}

impl BetaDistribution {
    /// Create a distribution with the given shape parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Posterior mean `alpha / (alpha + beta)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

/// When an experiment started and how long it is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingInfo {
    /// Moment the experiment started accepting traffic.
    pub started_at: DateTime<Utc>,
    /// Minimum runtime in days before any winner may be declared.
    pub min_duration_days: Option<f64>,
    /// Maximum runtime in days after which selection is forced.
    pub max_duration_days: Option<f64>,
}

impl TimingInfo {
    /// Timing info with no duration constraints.
    pub fn unconstrained(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            min_duration_days: None,
            max_duration_days: None,
        }
    }
}

/// An experiment as handed to the batch processor by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Stable experiment identifier.
    pub id: String,
    /// Human-readable experiment name.
    pub name: String,
    /// Per-variant aggregate snapshots.
    pub variants: Vec<VariantAggregate>,
    /// Decision configuration for this experiment.
    pub config: ExperimentConfig,
    /// Start time and duration constraints.
    pub timing: TimingInfo,
    /// Whether automatic winner selection is enabled.
    pub auto_select_enabled: bool,
}
