//! # verdict
//!
//! Statistical decision engine for A/B/n experiments.
//!
//! Given per-variant aggregate counters and a decision configuration, this
//! crate answers one question: can a winning variant be declared, and which
//! one, under the configured risk tolerance? It provides:
//!
//! - Confidence-interval math (Wilson score, proportion difference, lift)
//! - Bayesian inference over Beta-distributed conversion rates
//! - Sequential (early-stopping) hypothesis testing via the SPRT
//! - One-way ANOVA with Bonferroni-corrected pairwise comparisons
//! - Four interchangeable winner-selection strategies
//! - A batch processor applying winner selection across many experiments
//!
//! The engine performs no I/O: it consumes snapshots supplied by a storage
//! layer and produces plain-data decisions for that layer to persist.
//!
//! ## Quick Start
//!
//! ```
//! use verdict::{select_winner, ExperimentConfig, StrategyKind, VariantAggregate};
//!
//! let variants = vec![
//!     VariantAggregate::new("control", "Control", 1000, 100).control(),
//!     VariantAggregate::new("treatment", "Treatment", 1000, 150),
//! ];
//! let config = ExperimentConfig::new()
//!     .strategy(StrategyKind::Immediate)
//!     .significance_level(0.95)
//!     .minimum_sample_size(100);
//!
//! let winner = select_winner(&variants, &config).unwrap();
//! assert!(winner.is_some_and(|w| w.variant_id == "treatment" && w.meets_threshold));
//! ```
//!
//! ## Determinism
//!
//! Everything that samples randomness takes an injected [`rand::Rng`];
//! [`analysis::seeded_rng`] builds a deterministic generator so analyses
//! are reproducible.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod result;
mod selector;
mod types;

// Functional modules
pub mod analysis;
pub mod numerics;
pub mod output;
pub mod processor;
pub mod statistics;
pub mod strategy;

// Re-exports for the public API
pub use config::{ExperimentConfig, StrategyKind};
pub use error::{EngineError, StoreError};
pub use processor::{AutoWinnerProcessor, ExperimentStore};
pub use result::{
    AnovaResult, AutoWinnerResult, BayesianResult, BestVariant, ConfidenceInterval,
    ExperimentError, PairwiseComparison, SequentialDecision, SequentialTestResult,
    TimeConstraintStatus, WinnerCandidate,
};
pub use selector::{
    check_time_constraints, check_time_constraints_at, recommend_strategy, select_winner,
    validate_winner_config, ConfigViolation, DesiredSpeed, RecommendationContext,
};
pub use types::{BetaDistribution, Experiment, TimingInfo, VariantAggregate};
