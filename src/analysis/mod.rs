//! Statistical decision engines.
//!
//! Three independent lenses over the same per-variant counters:
//!
//! 1. **Bayesian inference** ([`bayes`]): Beta-Bernoulli posteriors, Monte
//!    Carlo probability-of-best and expected loss, credible intervals
//! 2. **Sequential testing** ([`sequential`]): SPRT log-likelihood ratio with
//!    early stopping, alpha-spending schedules, sample-size estimates
//! 3. **ANOVA** ([`anova`]): one-way F test over proportions with
//!    Bonferroni-corrected pairwise comparisons

pub mod anova;
pub mod bayes;
pub mod sequential;

pub use anova::{identify_best_variant, one_way_anova, pairwise_comparisons};
pub use bayes::{
    analyze_bayesian, analyze_bayesian_default, credible_interval, expected_loss, posterior_beta,
    probability_best, sample_beta, seeded_rng, DEFAULT_MONTE_CARLO_SAMPLES,
    MAX_MONTE_CARLO_SAMPLES,
};
pub use sequential::{
    alpha_spending, calculate_llr, estimate_sequential_sample_size, sequential_test,
    AlphaSpendingMethod,
};
