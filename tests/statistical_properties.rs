//! Property-based checks over the statistical machinery.
//!
//! These pin down structural invariants (bounds, symmetry, normalization)
//! across the whole input space rather than spot-checking textbook values;
//! the unit tests in `src/` handle the latter.

use proptest::prelude::*;

use verdict::analysis::{posterior_beta, probability_best, seeded_rng};
use verdict::statistics::{
    intervals_overlap, lift_interval, proportion_difference_interval, wilson_score_interval,
};
use verdict::BetaDistribution;

proptest! {
    #[test]
    fn wilson_interval_is_ordered_and_bounded(
        total in 1u64..100_000,
        numerator in 0u64..100_000,
        level in prop_oneof![Just(0.90), Just(0.95), Just(0.99), Just(0.999)],
    ) {
        let successes = numerator.min(total);
        let ci = wilson_score_interval(successes, total, level);
        let p = successes as f64 / total as f64;

        prop_assert!(ci.lower >= 0.0);
        prop_assert!(ci.upper <= 1.0);
        prop_assert!(ci.lower <= p + 1e-12, "lower {} above p {}", ci.lower, p);
        prop_assert!(ci.upper >= p - 1e-12, "upper {} below p {}", ci.upper, p);
        prop_assert_eq!(ci.level, level);
    }

    #[test]
    fn wilson_interval_narrows_with_sample_size(
        rate_pct in 1u64..100,
        level in prop_oneof![Just(0.90), Just(0.95), Just(0.99)],
    ) {
        let small = wilson_score_interval(rate_pct, 100, level);
        let large = wilson_score_interval(rate_pct * 100, 10_000, level);
        prop_assert!(
            large.upper - large.lower < small.upper - small.lower,
            "interval did not narrow: [{}, {}] vs [{}, {}]",
            small.lower, small.upper, large.lower, large.upper
        );
    }

    #[test]
    fn zero_total_yields_zero_interval(level in 0.5f64..0.999) {
        let ci = wilson_score_interval(0, 0, level);
        prop_assert_eq!(ci.lower, 0.0);
        prop_assert_eq!(ci.upper, 0.0);
    }

    #[test]
    fn overlap_is_symmetric(
        s1 in 0u64..1_000,
        n1 in 1u64..1_000,
        s2 in 0u64..1_000,
        n2 in 1u64..1_000,
    ) {
        let a = wilson_score_interval(s1.min(n1), n1, 0.95);
        let b = wilson_score_interval(s2.min(n2), n2, 0.95);
        prop_assert_eq!(intervals_overlap(&a, &b), intervals_overlap(&b, &a));
        prop_assert!(intervals_overlap(&a, &a));
    }

    #[test]
    fn difference_interval_contains_point_estimate(
        s1 in 0u64..1_000,
        n1 in 1u64..1_000,
        s2 in 0u64..1_000,
        n2 in 1u64..1_000,
    ) {
        let (s1, s2) = (s1.min(n1), s2.min(n2));
        let p1 = s1 as f64 / n1 as f64;
        let p2 = s2 as f64 / n2 as f64;
        let ci = proportion_difference_interval(p1, n1, p2, n2, 0.95);
        let diff = p1 - p2;
        prop_assert!(ci.lower <= diff + 1e-12);
        prop_assert!(ci.upper >= diff - 1e-12);
    }

    #[test]
    fn lift_interval_contains_point_lift(
        control_s in 1u64..1_000,
        control_n in 1u64..1_000,
        variant_s in 0u64..1_000,
        variant_n in 1u64..1_000,
    ) {
        let control_s = control_s.min(control_n);
        let variant_s = variant_s.min(variant_n);
        let control_rate = control_s as f64 / control_n as f64;
        let variant_rate = variant_s as f64 / variant_n as f64;
        prop_assume!(control_rate > 0.0);

        let ci = lift_interval(variant_rate, variant_n, control_rate, control_n, 0.95);
        let lift = (variant_rate - control_rate) / control_rate;
        prop_assert!(ci.lower <= lift + 1e-9);
        prop_assert!(ci.upper >= lift - 1e-9);
    }

    #[test]
    fn posterior_adds_counts_to_prior(
        successes in 0u64..1_000_000,
        failures in 0u64..1_000_000,
    ) {
        let post = posterior_beta(successes, failures, 1.0, 1.0);
        prop_assert_eq!(post.alpha, 1.0 + successes as f64);
        prop_assert_eq!(post.beta, 1.0 + failures as f64);
        prop_assert!(post.mean() > 0.0 && post.mean() < 1.0);
    }

    #[test]
    fn probability_best_is_a_distribution(
        counts in prop::collection::vec((0u64..500, 1u64..500), 2..6),
        seed in any::<u64>(),
    ) {
        let dists: Vec<BetaDistribution> = counts
            .iter()
            .map(|&(s, n)| {
                let s = s.min(n);
                posterior_beta(s, n - s, 1.0, 1.0)
            })
            .collect();

        let mut rng = seeded_rng(seed);
        let probs = probability_best(&dists, 500, &mut rng);

        prop_assert_eq!(probs.len(), dists.len());
        for &p in &probs {
            prop_assert!((0.0..=1.0).contains(&p));
        }
        let sum: f64 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9, "probabilities sum to {sum}");
    }
}
