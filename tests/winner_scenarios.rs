//! End-to-end winner-selection scenarios.
//!
//! Each test exercises the full path a caller would take: build variant
//! aggregates, configure the experiment, and ask for a decision.

use chrono::{Duration, Utc};
use verdict::{
    check_time_constraints_at, select_winner, validate_winner_config, ExperimentConfig,
    StrategyKind, VariantAggregate,
};

fn two_variants(
    control_n: u64,
    control_conversions: u64,
    variant_n: u64,
    variant_conversions: u64,
) -> Vec<VariantAggregate> {
    vec![
        VariantAggregate::new("control", "Control", control_n, control_conversions).control(),
        VariantAggregate::new("treatment", "Treatment", variant_n, variant_conversions),
    ]
}

#[test]
fn immediate_declares_winner_on_clear_separation() {
    // 15% vs 10% at 1000 impressions each: intervals separate at 95%.
    let variants = two_variants(1000, 100, 1000, 150);
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::Immediate)
        .significance_level(0.95)
        .minimum_sample_size(100);

    let winner = select_winner(&variants, &config).unwrap().unwrap();
    assert_eq!(winner.variant_id, "treatment");
    assert!(winner.meets_threshold);
    assert!((winner.lift - 0.5).abs() < 1e-9, "lift = {}", winner.lift);
    assert!(winner.confidence_interval.lower > 0.0);
    assert!(winner.confidence_interval.upper < 1.0);
}

#[test]
fn conservative_waits_for_confirmation() {
    // Rates separate at 100 impressions each, but Conservative wants every
    // variant at 150 (1.5x the minimum) before confirming.
    let variants = two_variants(100, 5, 100, 30);
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::Conservative)
        .significance_level(0.95)
        .minimum_sample_size(100);

    let immediate_config = config.strategy(StrategyKind::Immediate);
    let immediate = select_winner(&variants, &immediate_config).unwrap();
    assert!(
        immediate.is_some_and(|c| c.meets_threshold),
        "Immediate should confirm this separation"
    );

    let conservative = select_winner(&variants, &config).unwrap().unwrap();
    assert!(!conservative.meets_threshold);
    assert_eq!(conservative.variant_id, "treatment");
}

#[test]
fn conservative_confirms_once_floor_is_met() {
    let variants = two_variants(200, 10, 200, 60);
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::Conservative)
        .significance_level(0.95)
        .minimum_sample_size(100);

    let winner = select_winner(&variants, &config).unwrap().unwrap();
    assert!(winner.meets_threshold);
}

#[test]
fn safety_first_config_requires_larger_samples() {
    let config = ExperimentConfig {
        strategy: StrategyKind::SafetyFirst,
        significance_level: 0.95,
        minimum_sample_size: 50,
    };
    let violations = validate_winner_config(&config);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "minimum_sample_size");
}

#[test]
fn time_constraints_force_selection_past_maximum() {
    let now = Utc::now();
    let status = check_time_constraints_at(now - Duration::days(31), None, Some(30.0), now);
    assert!(status.should_force_selection);
    assert!(status.is_ready);
}

#[test]
fn single_variant_never_wins() {
    let variants = vec![VariantAggregate::new("only", "Only", 100_000, 20_000)];
    let winner = select_winner(&variants, &ExperimentConfig::default()).unwrap();
    assert!(winner.is_none());
}

#[test]
fn economic_strategy_end_to_end() {
    let variants = vec![
        VariantAggregate::new("control", "Control", 1000, 100)
            .control()
            .with_value(500.0),
        VariantAggregate::new("premium", "Premium", 1000, 150).with_value(1200.0),
    ];
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::Economic)
        .minimum_sample_size(100);

    let winner = select_winner(&variants, &config).unwrap().unwrap();
    assert_eq!(winner.variant_id, "premium");
    assert!(winner.meets_threshold);
    assert_eq!(winner.total_value, Some(1200.0));
    // Economic lift compares value per impression: (1.2 - 0.5) / 0.5.
    assert!((winner.lift - 1.4).abs() < 1e-9);
}

#[test]
fn safety_first_end_to_end() {
    let variants = two_variants(5000, 500, 5000, 900);
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::SafetyFirst)
        .minimum_sample_size(100);

    let winner = select_winner(&variants, &config).unwrap().unwrap();
    assert!(winner.meets_threshold);
    assert_eq!(winner.confidence_interval.level, 0.99);
}

#[test]
fn three_way_experiment_picks_the_top_variant() {
    let variants = vec![
        VariantAggregate::new("a", "Control", 2000, 200).control(),
        VariantAggregate::new("b", "Blue", 2000, 240),
        VariantAggregate::new("c", "Green", 2000, 340),
    ];
    let config = ExperimentConfig::new()
        .strategy(StrategyKind::Immediate)
        .minimum_sample_size(100);

    let winner = select_winner(&variants, &config).unwrap().unwrap();
    assert_eq!(winner.variant_id, "c");
    assert!((winner.lift - 0.7).abs() < 1e-9);
}
