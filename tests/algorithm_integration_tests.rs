//! End-to-end tests of the ruin-and-recreate search.

use sdvrp::config::{AcceptanceRuleType, Config, InterOperator, IntraOperator, RuinMethodType};
use sdvrp::instance::Instance;
use sdvrp::listener::Listener;
use sdvrp::solution::Solution;
use sdvrp::{solve_restored, solve_sdvrp, split_routes, Solver};
use std::cell::RefCell;
use std::rc::Rc;

fn quick_config(iterations: u64) -> Config {
    Config::default()
        .with_time_limit(30.0)
        .with_max_iterations(iterations)
}

/// Cost of a flat solution under `instance`, checking capacity and demands.
fn checked_cost(flat: &[i32], instance: &Instance) -> i32 {
    let mut demands = instance.demands.clone();
    let mut cost = 0;
    for route in split_routes(flat) {
        let load: i32 = route.iter().map(|&(_, load)| load).sum();
        assert!(load <= instance.capacity, "capacity exceeded");
        let mut previous = 0;
        for &(customer, load) in &route {
            demands[customer as usize] -= load;
            cost += instance.distance(previous, customer as u32);
            previous = customer as u32;
        }
        cost += instance.distance(previous, 0);
    }
    assert!(demands.iter().all(|&d| d == 0), "demands not served");
    cost
}

/// Every customer served by its own out-and-back trips.
fn trivial_cost(instance: &Instance) -> i32 {
    (1..instance.num_customers as u32)
        .map(|c| {
            let trips = (instance.demand(c) + instance.capacity - 1) / instance.capacity;
            trips * (instance.distance(0, c) + instance.distance(c, 0))
        })
        .sum()
}

#[derive(Default)]
struct Events {
    started: usize,
    updates: Vec<i32>,
    end: Option<i32>,
}

struct RecordingListener(Rc<RefCell<Events>>);

impl Listener for RecordingListener {
    fn on_start(&mut self) {
        self.0.borrow_mut().started += 1;
    }

    fn on_updated(&mut self, _solution: &Solution, objective: i32) {
        self.0.borrow_mut().updates.push(objective);
    }

    fn on_end(&mut self, _solution: &Solution, objective: i32) {
        self.0.borrow_mut().end = Some(objective);
    }
}

#[test]
fn test_single_customer() {
    let instance = Instance::from_coord_list(10, &[3], &[(0, 0), (3, 4)]).unwrap();
    let flat = solve_sdvrp(&quick_config(10), &instance).unwrap();
    assert_eq!(flat, vec![0, 1, 3, 0]);
    assert_eq!(checked_cost(&flat, &instance), 10);
}

#[test]
fn test_demand_above_capacity() {
    let instance = Instance::from_coord_list(10, &[25], &[(0, 0), (6, 8)]).unwrap();
    let flat = solve_sdvrp(&quick_config(20), &instance).unwrap();
    let routes = split_routes(&flat);
    assert_eq!(routes.len(), 3);
    assert_eq!(checked_cost(&flat, &instance), 60);
}

#[test]
fn test_zero_iterations_returns_initial_solution() {
    let coords: Vec<(i32, i32)> = (0..15).map(|i| (i * 13 % 29, i * 7 % 31)).collect();
    let demands: Vec<i32> = (1..15).map(|i| i % 5 + 1).collect();
    let instance = Instance::from_coord_list(12, &demands, &coords).unwrap();

    let mut solver = Solver::new(quick_config(0)).unwrap();
    let solution = solver.solve(&instance).unwrap();

    assert_eq!(solver.iterations, 0);
    assert!(solution.validate(&instance).is_ok());
    let statistics = solver.statistics.unwrap();
    assert_eq!(statistics.initial_objective, statistics.best_objective);
}

#[test]
fn test_same_seed_same_solution() {
    let coords: Vec<(i32, i32)> = (0..21).map(|i| (i * 37 % 101, i * 59 % 97)).collect();
    let demands: Vec<i32> = (1..21).map(|i| i * 7 % 9 + 1).collect();
    let instance = Instance::from_coord_list(20, &demands, &coords).unwrap();
    let config = quick_config(50).with_random_seed(7);

    let first = solve_sdvrp(&config, &instance).unwrap();
    let second = solve_sdvrp(&config, &instance).unwrap();
    assert_eq!(first, second);
    checked_cost(&first, &instance);
}

#[test]
fn test_listener_sees_improvements() {
    let coords: Vec<(i32, i32)> = (0..26).map(|i| (i * 37 % 101, i * 59 % 97)).collect();
    let demands: Vec<i32> = (1..26).map(|i| i * 7 % 9 + 1).collect();
    let instance = Instance::from_coord_list(20, &demands, &coords).unwrap();

    let events = Rc::new(RefCell::new(Events::default()));
    let mut solver = Solver::new(quick_config(100))
        .unwrap()
        .with_listener(Box::new(RecordingListener(events.clone())));
    let solution = solver.solve(&instance).unwrap();

    let events = events.borrow();
    assert_eq!(events.started, 1);
    assert!(events.updates.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(events.end, Some(solution.objective()));
    let statistics = solver.statistics.as_ref().unwrap();
    assert_eq!(statistics.improvements as usize, events.updates.len());
    assert!(statistics.best_objective <= statistics.initial_objective);
}

#[test]
fn test_every_strategy_combination_is_valid() {
    let coords: Vec<(i32, i32)> = (0..16).map(|i| (i * 41 % 89, i * 23 % 83)).collect();
    let demands: Vec<i32> = (1..16).map(|i| i * 5 % 11 + 2).collect();
    let instance = Instance::from_coord_list(18, &demands, &coords).unwrap();

    let rules = [
        AcceptanceRuleType::HC,
        AcceptanceRuleType::HCWE,
        AcceptanceRuleType::LAHC(10),
        AcceptanceRuleType::SA(50.0, 0.99),
    ];
    let ruins = [
        RuinMethodType::SISRs(5, 4, 0.5, 0.1),
        RuinMethodType::Random(vec![2, 4, 6]),
    ];
    for rule in rules {
        for ruin in ruins.iter().cloned() {
            let config = quick_config(30)
                .with_inter_operators(InterOperator::ALL.to_vec())
                .with_intra_operators(IntraOperator::ALL.to_vec())
                .with_acceptance_rule(rule)
                .with_ruin_method(ruin);
            let flat = solve_sdvrp(&config, &instance).unwrap();
            assert!(checked_cost(&flat, &instance) <= trivial_cost(&instance));
        }
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let instance = Instance::from_coord_list(10, &[3], &[(0, 0), (3, 4)]).unwrap();
    let config = quick_config(10).with_acceptance_rule(AcceptanceRuleType::LAHC(0));
    let error = solve_sdvrp(&config, &instance).unwrap_err();
    assert!(error.is_configuration_error());
}

#[test]
fn test_restored_detours_are_explicit() {
    // Customer 3 sits on the cheap path between 1 and 2
    let matrix = vec![
        vec![0, 10, 10, 10],
        vec![10, 0, 100, 2],
        vec![10, 100, 0, 2],
        vec![10, 2, 2, 0],
    ];
    let instance = Instance::from_dense_matrix(10, &[4, 4, 1], matrix).unwrap();
    let solution = solve_restored(&quick_config(20), &instance, None).unwrap();

    assert!(solution.validate(&instance).is_ok());
    assert_eq!(checked_cost(&solution.to_flat(), &instance), solution.objective());
    assert_eq!(solution.objective(), 24);
}

/// Cost of a flat solution with truncated Euclidean distances.
fn truncated_coord_cost(flat: &[i32], coords: &[(i32, i32)]) -> i32 {
    let dist = |a: usize, b: usize| {
        let (dx, dy) = (coords[a].0 - coords[b].0, coords[a].1 - coords[b].1);
        ((dx * dx + dy * dy) as f64).sqrt() as i32
    };
    split_routes(flat)
        .iter()
        .map(|route| {
            let mut previous = 0;
            let mut cost = 0;
            for &(customer, _) in route {
                cost += dist(previous, customer as usize);
                previous = customer as usize;
            }
            cost + dist(previous, 0)
        })
        .sum()
}

#[test]
fn test_dense_matrix() {
    #[rustfmt::skip]
    let instance = Instance::from_dense_matrix(
        100,
        &[60, 90, 60, 90, 60, 90, 60, 90],
        vec![
            vec![0, 100000, 100000, 100000, 100000, 200000, 200000, 200000, 200000],
            vec![100000, 0, 141421, 200000, 141421, 100000, 223607, 300000, 223607],
            vec![100000, 141421, 0, 141421, 200000, 223607, 100000, 223607, 300000],
            vec![100000, 200000, 141421, 0, 141421, 300000, 223607, 100000, 223607],
            vec![100000, 141421, 200000, 141421, 0, 223607, 300000, 223607, 100000],
            vec![200000, 100000, 223607, 300000, 223607, 0, 282843, 400000, 282843],
            vec![200000, 223607, 100000, 223607, 300000, 282843, 0, 282843, 400000],
            vec![200000, 300000, 223607, 100000, 223607, 400000, 282843, 0, 282843],
            vec![200000, 223607, 300000, 223607, 100000, 282843, 400000, 282843, 0],
        ],
    )
    .unwrap();

    let config = Config::default().with_time_limit(0.1);
    let flat = solve_sdvrp(&config, &instance).unwrap();
    let cost = checked_cost(&flat, &instance);
    assert!(cost <= 2282842, "cost {} should be at most 2282842", cost);
}

#[test]
fn test_coord_list() {
    #[rustfmt::skip]
    let coords = vec![
        (    0,      0), ( 1000,      0), (  924,    383), (  707,    707), (  383,    924), (    0,   1000), ( -383,    924),
        ( -707,    707), ( -924,    383), (-1000,      0), ( -924,   -383), ( -707,   -707), ( -383,   -924), (   -0,  -1000),
        (  383,   -924), (  707,   -707), (  924,   -383), ( 2000,      0), ( 1848,    765), ( 1414,   1414), (  765,   1848),
        (    0,   2000), ( -765,   1848), (-1414,   1414), (-1848,    766), (-2000,      0), (-1848,   -765), (-1414,  -1414),
        ( -766,  -1848), (   -0,  -2000), (  765,  -1848), ( 1414,  -1414), ( 1848,   -766), ( 3000,      0), ( 2772,   1148),
        ( 2121,   2121), ( 1148,   2772), (    0,   3000), (-1148,   2772), (-2121,   2121), (-2772,   1148), (-3000,      0),
        (-2772,  -1148), (-2122,  -2121), (-1148,  -2771), (   -0,  -3000), ( 1148,  -2772), ( 2121,  -2122), ( 2771,  -1149),
        ( 4000,      0), ( 3696,   1531), ( 2828,   2828), ( 1531,   3695), (    0,   4000), (-1531,   3696), (-2828,   2829),
        (-3695,   1531), (-4000,      0), (-3696,  -1530), (-2829,  -2828), (-1531,  -3695), (   -1,  -4000), ( 1530,  -3696),
        ( 2828,  -2829), ( 3695,  -1531),
    ];
    let demands: Vec<i32> = (0..64).map(|i| if i % 2 == 0 { 60 } else { 90 }).collect();
    let instance = Instance::from_coord_list(100, &demands, &coords).unwrap();

    let config = Config::default().with_time_limit(5.0);
    let flat = solve_sdvrp(&config, &instance).unwrap();
    checked_cost(&flat, &instance);
    let cost = truncated_coord_cost(&flat, &coords);
    assert!(cost <= 268475, "cost {} should be at most 268475", cost);
}
