//! Frequentist interval and sample-size machinery.
//!
//! This module provides the confidence-interval math every selection
//! strategy builds on:
//! - Wilson score intervals for binomial proportions
//! - Normal-approximation intervals on proportion differences and lift
//! - Interval overlap testing
//! - Minimum-sample-size and power calculators for experiment planning

mod intervals;
mod power;

pub use intervals::{
    intervals_overlap, lift_interval, proportion_difference_interval, wilson_score_interval,
};
pub use power::{estimate_power, minimum_sample_size};
