//! Acceptance rules deciding whether a candidate replaces the current solution.

use crate::config::AcceptanceRuleType;
use crate::error::SolverError;
use crate::Random;
use rand::Rng;

/// Decides whether a candidate objective replaces the current one.
pub trait AcceptanceRule {
    fn accept(&mut self, current: i32, candidate: i32, rng: &mut Random) -> bool;
}

/// Accepts strictly improving candidates.
#[derive(Debug, Clone, Default)]
pub struct HillClimbing;

impl AcceptanceRule for HillClimbing {
    fn accept(&mut self, current: i32, candidate: i32, _rng: &mut Random) -> bool {
        candidate < current
    }
}

/// Accepts improving or equal candidates.
#[derive(Debug, Clone, Default)]
pub struct HillClimbingWithEqual;

impl AcceptanceRule for HillClimbingWithEqual {
    fn accept(&mut self, current: i32, candidate: i32, _rng: &mut Random) -> bool {
        candidate <= current
    }
}

/// Late acceptance hill climbing.
///
/// A candidate is compared against the current objective of `length`
/// decisions ago. The history is filled with the first current objective.
#[derive(Debug, Clone)]
pub struct LateAcceptanceHillClimbing {
    length: usize,
    history: Vec<i32>,
    position: usize,
}

impl LateAcceptanceHillClimbing {
    pub fn new(length: usize) -> Self {
        LateAcceptanceHillClimbing {
            length: length.max(1),
            history: Vec::new(),
            position: 0,
        }
    }
}

impl AcceptanceRule for LateAcceptanceHillClimbing {
    fn accept(&mut self, current: i32, candidate: i32, _rng: &mut Random) -> bool {
        if self.history.is_empty() {
            self.history = vec![current; self.length];
        }
        let accepted = candidate <= self.history[self.position];
        self.history[self.position] = if accepted { candidate } else { current };
        self.position = (self.position + 1) % self.length;
        accepted
    }
}

/// Simulated annealing with geometric cooling.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    temperature: f64,
    decay: f64,
}

impl SimulatedAnnealing {
    pub fn new(initial_temperature: f64, decay: f64) -> Self {
        SimulatedAnnealing {
            temperature: initial_temperature,
            decay,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Probability of accepting a candidate worse by `delta` at the current temperature.
    pub fn acceptance_probability(&self, delta: i32) -> f64 {
        if delta <= 0 {
            1.0
        } else if self.temperature <= 0.0 {
            0.0
        } else {
            (-(delta as f64) / self.temperature).exp()
        }
    }
}

impl AcceptanceRule for SimulatedAnnealing {
    fn accept(&mut self, current: i32, candidate: i32, rng: &mut Random) -> bool {
        let delta = candidate - current;
        let accepted = if delta <= 0 {
            true
        } else {
            let probability = self.acceptance_probability(delta);
            probability > 0.0 && rng.gen::<f64>() < probability
        };
        self.temperature *= self.decay;
        accepted
    }
}

/// Build the rule described by a configuration entry.
pub fn create_acceptance_rule(
    rule_type: &AcceptanceRuleType,
) -> Result<Box<dyn AcceptanceRule>, SolverError> {
    match *rule_type {
        AcceptanceRuleType::HC => Ok(Box::new(HillClimbing)),
        AcceptanceRuleType::HCWE => Ok(Box::new(HillClimbingWithEqual)),
        AcceptanceRuleType::LAHC(length) => {
            if length <= 0 {
                return Err(SolverError::InvalidConfig(format!(
                    "LAHC length must be positive, got {}",
                    length
                )));
            }
            Ok(Box::new(LateAcceptanceHillClimbing::new(length as usize)))
        }
        AcceptanceRuleType::SA(initial_temperature, decay) => {
            Ok(Box::new(SimulatedAnnealing::new(initial_temperature, decay)))
        }
    }
}
