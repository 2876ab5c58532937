//! Unit tests for the solution representation.

use sdvrp::error::SolverError;
use sdvrp::instance::Instance;
use sdvrp::solution::Solution;
use sdvrp::split_routes;

/// Creates a simple test instance with a depot and customers in a grid.
fn create_test_instance(capacity: i32) -> Instance {
    // Depot at (0, 0), customers at (10, 0), (0, 10), (10, 10), (20, 0), (20, 10)
    let coords = vec![(0, 0), (10, 0), (0, 10), (10, 10), (20, 0), (20, 10)];
    Instance::from_coord_list(capacity, &[3, 4, 2, 5, 6], &coords).unwrap()
}

/// Creates an asymmetric instance where going "up" is cheap and "down" is expensive.
fn create_asymmetric_instance() -> Instance {
    let n = 5;
    let matrix: Vec<Vec<i32>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| match i.cmp(&j) {
                    std::cmp::Ordering::Less => (j - i) as i32,
                    std::cmp::Ordering::Equal => 0,
                    std::cmp::Ordering::Greater => 3 * (i - j) as i32,
                })
                .collect()
        })
        .collect();
    Instance::from_dense_matrix(100, &[1, 1, 1, 1], matrix).unwrap()
}

/// Builds `[1, 3, 4]` and `[2, 5]`, which serves every demand within capacity 10.
fn create_valid_solution(instance: &Instance) -> Solution {
    let mut solution = Solution::new();
    let n1 = solution.insert(instance, 1, 3, 0, 0);
    let n3 = solution.insert_after(instance, n1, 3, 2);
    solution.insert_after(instance, n3, 4, 5);
    let n2 = solution.insert(instance, 2, 4, 0, 0);
    solution.insert_after(instance, n2, 5, 6);
    solution
}

#[test]
fn test_insert_updates_objective() {
    let instance = create_test_instance(10);
    let mut solution = Solution::new();

    let n1 = solution.insert(&instance, 1, 3, 0, 0);
    assert_eq!(solution.objective(), 20);

    // 0 -> 1 -> 3 -> 0: 10 + 10 + 14
    solution.insert_after(&instance, n1, 3, 2);
    assert_eq!(solution.objective(), 34);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
}

#[test]
fn test_remove_restores_objective_and_reuses_slot() {
    let instance = create_test_instance(10);
    let mut solution = Solution::new();
    let n1 = solution.insert(&instance, 1, 3, 0, 0);
    let n3 = solution.insert_after(&instance, n1, 3, 2);

    assert_eq!(solution.remove(&instance, n3), (3, 2));
    assert_eq!(solution.objective(), 20);
    assert!(!solution.is_live(n3));

    let again = solution.insert_after(&instance, n1, 2, 4);
    assert_eq!(again, n3);
    assert_eq!(solution.node_indices().count(), 2);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
}

#[test]
fn test_route_traversal() {
    let instance = create_test_instance(10);
    let solution = create_valid_solution(&instance);

    assert_eq!(solution.get_route_count(), 2);
    let routes = solution.routes();
    assert_eq!(routes[0], vec![(1, 3), (3, 2), (4, 5)]);
    assert_eq!(routes[1], vec![(2, 4), (5, 6)]);

    for head in solution.route_heads() {
        for node in solution.route_nodes(head) {
            assert_eq!(solution.head_of(node), head);
        }
    }
}

#[test]
fn test_validate_accepts_valid_solution() {
    let instance = create_test_instance(10);
    let solution = create_valid_solution(&instance);
    assert!(solution.validate(&instance).is_ok());
}

#[test]
fn test_validate_detects_capacity_violation() {
    let instance = create_test_instance(10);
    let mut solution = Solution::new();
    let n1 = solution.insert(&instance, 1, 3, 0, 0);
    let n2 = solution.insert_after(&instance, n1, 2, 4);
    solution.insert_after(&instance, n2, 3, 2);
    let n4 = solution.insert(&instance, 4, 5, 0, 0);
    solution.insert_after(&instance, n4, 5, 6);

    let error = solution.validate(&instance).unwrap_err();
    assert!(matches!(error, SolverError::CapacityExceeded { load: 11, .. }));
    assert!(error.is_invariant_violation());
}

#[test]
fn test_validate_detects_missing_demand() {
    let instance = create_test_instance(10);
    let mut solution = create_valid_solution(&instance);
    let node = solution
        .node_indices()
        .find(|&n| solution.customer(n) == 5)
        .unwrap();
    solution.set_load(node, 4);

    let error = solution.validate(&instance).unwrap_err();
    assert!(matches!(
        error,
        SolverError::DemandMismatch {
            customer: 5,
            served: 4,
            demand: 6
        }
    ));
}

#[test]
fn test_splice_segment_between_routes() {
    let instance = create_test_instance(20);
    let mut solution = create_valid_solution(&instance);
    let nodes: Vec<_> = solution.route_nodes(solution.route_heads().next().unwrap()).collect();
    let head2 = solution.route_heads().nth(1).unwrap();

    // Move [3, 4] to the front of the second route
    solution.splice_segment(&instance, nodes[1], nodes[2], 0, head2);

    let routes = solution.routes();
    assert_eq!(routes[0], vec![(1, 3)]);
    assert_eq!(routes[1], vec![(3, 2), (4, 5), (2, 4), (5, 6)]);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
}

#[test]
fn test_splice_segment_into_new_route() {
    let instance = create_test_instance(10);
    let mut solution = create_valid_solution(&instance);
    let head = solution.route_heads().next().unwrap();
    let last = solution.route_nodes(head).last().unwrap();

    solution.splice_segment(&instance, last, last, 0, 0);

    assert_eq!(solution.get_route_count(), 3);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
    assert!(solution.validate(&instance).is_ok());
}

#[test]
fn test_reverse_segment_asymmetric() {
    let instance = create_asymmetric_instance();
    let mut solution = Solution::new();
    let mut previous = 0;
    for customer in 1..=4 {
        previous = solution.insert(&instance, customer, 1, previous, 0);
    }
    // 0 -> 1 -> 2 -> 3 -> 4 -> 0: 1 + 1 + 1 + 1 + 12
    assert_eq!(solution.objective(), 16);

    let nodes: Vec<_> = solution.route_nodes(solution.route_heads().next().unwrap()).collect();
    solution.reverse_segment(&instance, nodes[1], nodes[3]);

    // 0 -> 1 -> 4 -> 3 -> 2 -> 0: 1 + 3 + 3 + 3 + 6
    assert_eq!(solution.routes()[0], vec![(1, 1), (4, 1), (3, 1), (2, 1)]);
    assert_eq!(solution.objective(), 16);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));

    // Reversing the whole route moves the head
    solution.reverse_segment(&instance, nodes[0], nodes[1]);
    assert_eq!(solution.routes()[0], vec![(2, 1), (3, 1), (4, 1), (1, 1)]);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
}

#[test]
fn test_split_after() {
    let instance = create_test_instance(10);
    let mut solution = create_valid_solution(&instance);
    let head = solution.route_heads().next().unwrap();

    solution.split_after(&instance, head);

    assert_eq!(solution.get_route_count(), 3);
    assert_eq!(solution.objective(), solution.recompute_objective(&instance));
    assert!(solution.validate(&instance).is_ok());
}

#[test]
fn test_flat_encoding() {
    let instance = create_test_instance(10);
    let solution = create_valid_solution(&instance);

    let flat = solution.to_flat();
    assert_eq!(flat, vec![0, 1, 3, 3, 2, 4, 5, 0, 0, 2, 4, 5, 6, 0]);

    let routes = split_routes(&flat);
    assert_eq!(routes, vec![vec![(1, 3), (3, 2), (4, 5)], vec![(2, 4), (5, 6)]]);
}
