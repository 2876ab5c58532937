//! Ordering of removed customers before they are reinserted.

use crate::config::SortCriterion;
use crate::instance::Instance;
use crate::solution::Customer;
use crate::Random;
use rand::Rng;

/// Weighted combination of sort criteria.
#[derive(Debug, Clone, Default)]
pub struct Sorter {
    criteria: Vec<(SortCriterion, f64)>,
}

impl Sorter {
    pub fn new(criteria: Vec<(SortCriterion, f64)>) -> Self {
        Sorter { criteria }
    }

    pub fn add_criterion(&mut self, criterion: SortCriterion, weight: f64) {
        self.criteria.push((criterion, weight));
    }

    fn uses_random(&self) -> bool {
        self.criteria
            .iter()
            .any(|&(criterion, weight)| criterion == SortCriterion::Random && weight != 0.0)
    }

    /// Sort `(customer, amount)` pairs by decreasing score.
    ///
    /// Ties keep their input order. The generator is only consumed when a
    /// random criterion has a non-zero weight.
    pub fn sort(&self, instance: &Instance, customers: &mut Vec<(Customer, i32)>, rng: &mut Random) {
        if customers.len() < 2 || self.criteria.is_empty() {
            return;
        }

        let max_load = customers.iter().map(|&(_, load)| load).max().unwrap_or(0);
        let max_distance = customers
            .iter()
            .map(|&(customer, _)| instance.distance(0, customer))
            .max()
            .unwrap_or(0);
        let uses_random = self.uses_random();

        let mut scored: Vec<(f64, (Customer, i32))> = customers
            .iter()
            .map(|&(customer, load)| {
                let random = if uses_random { rng.gen::<f64>() } else { 0.0 };
                let demand = ratio(load, max_load);
                let far = ratio(instance.distance(0, customer), max_distance);
                let score = self
                    .criteria
                    .iter()
                    .map(|&(criterion, weight)| {
                        weight
                            * match criterion {
                                SortCriterion::Random => random,
                                SortCriterion::Demand => demand,
                                SortCriterion::Far => far,
                                SortCriterion::Close => 1.0 - far,
                            }
                    })
                    .sum();
                (score, (customer, load))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        customers.clear();
        customers.extend(scored.into_iter().map(|(_, entry)| entry));
    }
}

fn ratio(value: i32, max: i32) -> f64 {
    if max <= 0 {
        0.0
    } else {
        value as f64 / max as f64
    }
}
