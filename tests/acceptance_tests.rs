//! Unit tests for the acceptance rules.

use rand::SeedableRng;
use sdvrp::acceptance::{
    create_acceptance_rule, AcceptanceRule, HillClimbing, HillClimbingWithEqual,
    LateAcceptanceHillClimbing, SimulatedAnnealing,
};
use sdvrp::config::AcceptanceRuleType;
use sdvrp::Random;

#[test]
fn test_hill_climbing() {
    let mut rng = Random::seed_from_u64(0);
    let mut rule = HillClimbing;
    assert!(rule.accept(100, 99, &mut rng));
    assert!(!rule.accept(100, 100, &mut rng));
    assert!(!rule.accept(100, 101, &mut rng));
}

#[test]
fn test_hill_climbing_with_equal() {
    let mut rng = Random::seed_from_u64(0);
    let mut rule = HillClimbingWithEqual;
    assert!(rule.accept(100, 99, &mut rng));
    assert!(rule.accept(100, 100, &mut rng));
    assert!(!rule.accept(100, 101, &mut rng));
}

#[test]
fn test_late_acceptance_compares_with_history() {
    let mut rng = Random::seed_from_u64(0);
    let mut rule = LateAcceptanceHillClimbing::new(2);

    // History starts as [100, 100]
    assert!(rule.accept(100, 90, &mut rng));
    // Worse than current but not than two steps ago
    assert!(rule.accept(90, 95, &mut rng));
    // Compared against 90, recorded after the first decision
    assert!(!rule.accept(95, 93, &mut rng));
    assert!(rule.accept(95, 95, &mut rng));
}

#[test]
fn test_late_acceptance_of_length_one_accepts_ties() {
    let mut rng = Random::seed_from_u64(0);
    let mut late = LateAcceptanceHillClimbing::new(1);
    let mut equal = HillClimbingWithEqual;

    let mut current = 50;
    for candidate in [60, 50, 40, 45, 40, 30, 31] {
        let expected = equal.accept(current, candidate, &mut rng);
        assert_eq!(late.accept(current, candidate, &mut rng), expected);
        if expected {
            current = candidate;
        }
    }
}

#[test]
fn test_simulated_annealing_cools_down() {
    let mut rng = Random::seed_from_u64(0);
    let mut rule = SimulatedAnnealing::new(100.0, 0.5);
    assert!((rule.acceptance_probability(10) - (-0.1f64).exp()).abs() < 1e-12);
    assert_eq!(rule.acceptance_probability(-5), 1.0);

    for _ in 0..3 {
        assert!(rule.accept(100, 90, &mut rng));
    }
    assert!((rule.temperature() - 12.5).abs() < 1e-12);
}

#[test]
fn test_simulated_annealing_acceptance_frequency() {
    let mut rng = Random::seed_from_u64(17);
    let trials = 20_000;

    for delta in [5, 20] {
        // A decay of 1 keeps the temperature at 10
        let mut rule = SimulatedAnnealing::new(10.0, 1.0);
        let expected = (-(delta as f64) / 10.0).exp();
        let accepted = (0..trials)
            .filter(|_| rule.accept(100, 100 + delta, &mut rng))
            .count();
        let frequency = accepted as f64 / trials as f64;
        assert!(
            (frequency - expected).abs() < 0.02,
            "delta {}: accepted {} of the time, expected {}",
            delta,
            frequency,
            expected
        );
    }
}

#[test]
fn test_simulated_annealing_at_zero_temperature() {
    let mut rng = Random::seed_from_u64(0);
    let mut rule = SimulatedAnnealing::new(0.0, 0.9);
    for _ in 0..100 {
        assert!(!rule.accept(100, 101, &mut rng));
    }
    assert!(rule.accept(100, 100, &mut rng));
}

#[test]
fn test_simulated_annealing_accepts_some_worse_candidates() {
    let mut rng = Random::seed_from_u64(4);
    let mut rule = SimulatedAnnealing::new(1e9, 1.0);
    let accepted = (0..100).filter(|_| rule.accept(100, 110, &mut rng)).count();
    assert!(accepted > 90);
}

#[test]
fn test_create_acceptance_rule() {
    let mut rng = Random::seed_from_u64(0);

    let mut rule = create_acceptance_rule(&AcceptanceRuleType::HC).unwrap();
    assert!(!rule.accept(10, 10, &mut rng));

    let mut rule = create_acceptance_rule(&AcceptanceRuleType::HCWE).unwrap();
    assert!(rule.accept(10, 10, &mut rng));

    let mut rule = create_acceptance_rule(&AcceptanceRuleType::LAHC(5)).unwrap();
    assert!(rule.accept(10, 10, &mut rng));

    let mut rule = create_acceptance_rule(&AcceptanceRuleType::SA(0.0, 0.5)).unwrap();
    assert!(!rule.accept(10, 11, &mut rng));

    let error = create_acceptance_rule(&AcceptanceRuleType::LAHC(0)).err().unwrap();
    assert!(error.is_configuration_error());
}
