//! Unit tests for configuration and instance loading.

use sdvrp::config::{
    AcceptanceRuleType, Config, InterOperator, IntraOperator, RuinMethodType, SortCriterion,
};
use sdvrp::error::SolverError;
use sdvrp::instance::{InputFormat, Instance, InstanceInput};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.random_seed, 42);
    assert_eq!(config.time_limit, 20.0);
    assert_eq!(config.max_iterations, None);
    assert_eq!(config.blink_rate, 0.021);
    assert_eq!(config.inter_operators.len(), 7);
    assert_eq!(config.inter_operators[0], InterOperator::Relocate);
    assert_eq!(
        config.intra_operators,
        vec![IntraOperator::Exchange, IntraOperator::OrOpt1]
    );
    assert_eq!(config.acceptance_rule_type, AcceptanceRuleType::LAHC(83));
    assert_eq!(
        config.ruin_method_type,
        RuinMethodType::SISRs(36, 8, 0.740, 0.096)
    );
    assert_eq!(config.sorters.len(), 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_operator_names() {
    for operator in InterOperator::ALL {
        assert_eq!(operator.to_str().parse::<InterOperator>().unwrap(), operator);
    }
    for operator in IntraOperator::ALL {
        assert_eq!(operator.to_str().parse::<IntraOperator>().unwrap(), operator);
    }
    assert_eq!("Swap<2, 1>".parse::<InterOperator>().unwrap(), InterOperator::Swap21);
    assert_eq!("OrOpt<3>".parse::<IntraOperator>().unwrap(), IntraOperator::OrOpt3);
    assert_eq!("far".parse::<SortCriterion>().unwrap(), SortCriterion::Far);
}

#[test]
fn test_unknown_names_are_rejected() {
    let error = "TwoOpt".parse::<InterOperator>().unwrap_err();
    assert!(matches!(error, SolverError::UnknownName { ref name, .. } if name == "TwoOpt"));
    assert!(error.is_configuration_error());
    assert_eq!(error.to_string(), "Invalid inter operator: TwoOpt");

    assert!("OrOpt<4>".parse::<IntraOperator>().is_err());
    assert!("nearest".parse::<SortCriterion>().is_err());
    assert!(AcceptanceRuleType::from_name("GreatDeluge", 10, 1.0, 0.9).is_err());
    assert!(RuinMethodType::from_name("Radial", 10, 10, 0.5, 0.1, &[]).is_err());
}

#[test]
fn test_strategies_from_names() {
    assert_eq!(
        AcceptanceRuleType::from_name("LAHC", 50, 1.0, 0.9).unwrap(),
        AcceptanceRuleType::LAHC(50)
    );
    assert_eq!(
        AcceptanceRuleType::from_name("SA", 50, 100.0, 0.99).unwrap(),
        AcceptanceRuleType::SA(100.0, 0.99)
    );
    assert_eq!(
        RuinMethodType::from_name("Random", 10, 10, 0.5, 0.1, &[5, 10]).unwrap(),
        RuinMethodType::Random(vec![5, 10])
    );
    assert_eq!(
        RuinMethodType::from_name("SISRs", 10, 5, 0.5, 0.1, &[]).unwrap(),
        RuinMethodType::SISRs(10, 5, 0.5, 0.1)
    );
}

#[test]
fn test_config_from_names() {
    let config = Config::from_names(
        7,
        1.5,
        0.01,
        &["Relocate", "SdSwapTwoOne"],
        &["OrOpt<2>"],
        AcceptanceRuleType::HCWE,
        RuinMethodType::Random(vec![3]),
        &[("demand", 1.0), ("close", 0.5)],
    )
    .unwrap();
    assert_eq!(config.random_seed, 7);
    assert_eq!(
        config.inter_operators,
        vec![InterOperator::Relocate, InterOperator::SdSwapTwoOne]
    );
    assert_eq!(config.sorters[1], (SortCriterion::Close, 0.5));

    let error = Config::from_names(
        7,
        1.5,
        0.01,
        &["Relocate", "Unknown"],
        &[],
        AcceptanceRuleType::HC,
        RuinMethodType::default(),
        &[],
    )
    .unwrap_err();
    assert!(error.is_configuration_error());
}

#[test]
fn test_validate_rejects_out_of_range() {
    assert!(Config::default().with_blink_rate(1.5).validate().is_err());
    assert!(Config::default().with_time_limit(-1.0).validate().is_err());
    assert!(Config::default()
        .with_acceptance_rule(AcceptanceRuleType::LAHC(0))
        .validate()
        .is_err());
    assert!(Config::default()
        .with_acceptance_rule(AcceptanceRuleType::SA(10.0, 0.0))
        .validate()
        .is_err());
    assert!(Config::default()
        .with_ruin_method(RuinMethodType::SISRs(10, 10, 0.5, 1.5))
        .validate()
        .is_err());
    assert!(Config::default()
        .with_ruin_method(RuinMethodType::SISRs(10, 10, 0.5, 1.0))
        .validate()
        .is_ok());
    assert!(Config::default()
        .with_ruin_method(RuinMethodType::Random(vec![]))
        .validate()
        .is_err());
    assert!(Config::default()
        .with_sorters(vec![(SortCriterion::Far, f64::NAN)])
        .validate()
        .is_err());
}

#[test]
fn test_time_limit_duration_saturates() {
    let config = Config::default().with_time_limit(f64::INFINITY);
    assert_eq!(config.time_limit_duration(), std::time::Duration::MAX);
    let config = Config::default().with_time_limit(0.25);
    assert_eq!(config.time_limit_duration().as_millis(), 250);
}

#[test]
fn test_config_serde() {
    let config = Config::default().with_inter_operators(vec![InterOperator::Swap20]);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"Swap<2, 0>\""));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.inter_operators, vec![InterOperator::Swap20]);
    assert_eq!(parsed.ruin_method_type, config.ruin_method_type);

    // Missing fields take their defaults
    let partial: Config = serde_json::from_str(r#"{"random_seed": 3, "time_limit": 1.0}"#).unwrap();
    assert_eq!(partial.random_seed, 3);
    assert_eq!(partial.blink_rate, 0.021);
    assert_eq!(partial.acceptance_rule_type, AcceptanceRuleType::LAHC(83));
}

#[test]
fn test_instance_from_flat() {
    let instance = Instance::from_flat(10, &[1, 2], "DENSE_MATRIX", &[0, 1, 2, 1, 0, 3, 2, 3, 0], &[], &[])
        .unwrap();
    assert_eq!(instance.get_customer_count(), 2);
    assert_eq!(instance.distance(1, 2), 3);
    assert_eq!(instance.total_demand(), 3);

    let instance =
        Instance::from_flat(10, &[1, 1], "COORD_LIST", &[], &[0, 3, 0], &[0, 4, 1]).unwrap();
    assert_eq!(instance.distance(0, 1), 5);
    assert_eq!(instance.distance(1, 2), 4);

    let error = Instance::from_flat(10, &[1], "EUC_2D", &[], &[], &[]).unwrap_err();
    assert!(matches!(error, SolverError::UnknownInputFormat(ref tag) if tag == "EUC_2D"));
    assert!(error.is_configuration_error());

    let error = Instance::from_flat(10, &[1, 2], "DENSE_MATRIX", &[0, 1, 1, 0], &[], &[]).unwrap_err();
    assert!(matches!(error, SolverError::InvalidInstance(_)));
}

#[test]
fn test_coordinate_distances_are_rounded() {
    let coords = [(0, 0), (3, 4), (1, 1), (1, 2), (2, 3)];
    let instance = Instance::from_coord_list(10, &[1, 1, 1, 1], &coords).unwrap();
    assert_eq!(instance.distance(0, 1), 5);
    assert_eq!(instance.distance(0, 2), 1);
    assert_eq!(instance.distance(0, 3), 2);
    assert_eq!(instance.distance(0, 4), 4);
}

#[test]
fn test_invalid_instances() {
    let coords = [(0, 0), (1, 0)];
    assert!(Instance::from_coord_list(10, &[-1], &coords).is_err());
    assert!(Instance::from_coord_list(0, &[1], &coords).is_err());
    assert!(Instance::from_coord_list(10, &[1, 1], &coords).is_err());
    assert!(Instance::from_dense_matrix(10, &[1], vec![vec![0, 1], vec![1, 1]]).is_err());
    assert!(Instance::from_dense_matrix(10, &[1], vec![vec![0, -1], vec![1, 0]]).is_err());
}

#[test]
fn test_neighbors_nearest_first() {
    let coords = [(0, 0), (10, 0), (1, 0), (5, 0)];
    let instance = Instance::from_coord_list(10, &[1, 1, 1], &coords).unwrap();
    assert_eq!(instance.get_neighbors(1), vec![3, 2]);
    assert_eq!(instance.get_neighbors(2), vec![3, 1]);
}

#[test]
fn test_instance_input_json() {
    let input = InstanceInput {
        capacity: 5,
        demands: vec![2, 3],
        input: InputFormat::CoordList(vec![(0, 0), (0, 6), (8, 0)]),
    };
    let json = serde_json::to_string(&input).unwrap();
    let parsed: InstanceInput = serde_json::from_str(&json).unwrap();
    let instance = Instance::from_input(&parsed).unwrap();
    assert_eq!(instance.distance(1, 2), 10);
    assert_eq!(instance.demand(2), 3);
}
