//! Configuration parameters for the SDVRP solver.

use crate::error::SolverError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Inter-route operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterOperator {
    #[serde(rename = "Swap<2, 0>")]
    Swap20,
    #[serde(rename = "Swap<2, 1>")]
    Swap21,
    #[serde(rename = "Swap<2, 2>")]
    Swap22,
    Relocate,
    SwapStar,
    Cross,
    SdSwapStar,
    SdSwapOneOne,
    SdSwapTwoOne,
}

impl InterOperator {
    pub const ALL: [InterOperator; 9] = [
        InterOperator::Swap20,
        InterOperator::Swap21,
        InterOperator::Swap22,
        InterOperator::Relocate,
        InterOperator::SwapStar,
        InterOperator::Cross,
        InterOperator::SdSwapStar,
        InterOperator::SdSwapOneOne,
        InterOperator::SdSwapTwoOne,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            InterOperator::Swap20 => "Swap<2, 0>",
            InterOperator::Swap21 => "Swap<2, 1>",
            InterOperator::Swap22 => "Swap<2, 2>",
            InterOperator::Relocate => "Relocate",
            InterOperator::SwapStar => "SwapStar",
            InterOperator::Cross => "Cross",
            InterOperator::SdSwapStar => "SdSwapStar",
            InterOperator::SdSwapOneOne => "SdSwapOneOne",
            InterOperator::SdSwapTwoOne => "SdSwapTwoOne",
        }
    }
}

impl FromStr for InterOperator {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterOperator::ALL
            .iter()
            .copied()
            .find(|op| op.to_str() == s)
            .ok_or_else(|| SolverError::UnknownName {
                kind: "inter operator",
                name: s.to_string(),
            })
    }
}

/// Intra-route operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntraOperator {
    Exchange,
    #[serde(rename = "OrOpt<1>")]
    OrOpt1,
    #[serde(rename = "OrOpt<2>")]
    OrOpt2,
    #[serde(rename = "OrOpt<3>")]
    OrOpt3,
}

impl IntraOperator {
    pub const ALL: [IntraOperator; 4] = [
        IntraOperator::Exchange,
        IntraOperator::OrOpt1,
        IntraOperator::OrOpt2,
        IntraOperator::OrOpt3,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            IntraOperator::Exchange => "Exchange",
            IntraOperator::OrOpt1 => "OrOpt<1>",
            IntraOperator::OrOpt2 => "OrOpt<2>",
            IntraOperator::OrOpt3 => "OrOpt<3>",
        }
    }
}

impl FromStr for IntraOperator {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntraOperator::ALL
            .iter()
            .copied()
            .find(|op| op.to_str() == s)
            .ok_or_else(|| SolverError::UnknownName {
                kind: "intra operator",
                name: s.to_string(),
            })
    }
}

/// Acceptance rule and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AcceptanceRuleType {
    /// Hill climbing: strictly better only.
    HC,
    /// Hill climbing that also accepts ties.
    HCWE,
    /// Late acceptance hill climbing with the given history length.
    LAHC(i32),
    /// Simulated annealing with initial temperature and decay.
    SA(f64, f64),
}

impl Default for AcceptanceRuleType {
    fn default() -> Self {
        AcceptanceRuleType::LAHC(83)
    }
}

impl AcceptanceRuleType {
    /// Select a rule by name. Parameters not used by the rule are ignored.
    pub fn from_name(
        name: &str,
        lahc_length: i32,
        sa_initial_temperature: f64,
        sa_decay: f64,
    ) -> Result<Self, SolverError> {
        match name {
            "HC" => Ok(AcceptanceRuleType::HC),
            "HCWE" => Ok(AcceptanceRuleType::HCWE),
            "LAHC" => Ok(AcceptanceRuleType::LAHC(lahc_length)),
            "SA" => Ok(AcceptanceRuleType::SA(sa_initial_temperature, sa_decay)),
            _ => Err(SolverError::UnknownName {
                kind: "acceptance rule",
                name: name.to_string(),
            }),
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            AcceptanceRuleType::HC => "HC",
            AcceptanceRuleType::HCWE => "HCWE",
            AcceptanceRuleType::LAHC(_) => "LAHC",
            AcceptanceRuleType::SA(_, _) => "SA",
        }
    }

    fn validate(&self) -> Result<(), SolverError> {
        match *self {
            AcceptanceRuleType::LAHC(length) if length <= 0 => Err(SolverError::InvalidConfig(
                format!("LAHC length must be positive, got {}", length),
            )),
            AcceptanceRuleType::SA(temperature, _)
                if !(temperature >= 0.0 && temperature.is_finite()) =>
            {
                Err(SolverError::InvalidConfig(format!(
                    "SA initial temperature must be non-negative, got {}",
                    temperature
                )))
            }
            AcceptanceRuleType::SA(_, decay) if !(decay > 0.0 && decay <= 1.0) => Err(
                SolverError::InvalidConfig(format!("SA decay must be in (0, 1], got {}", decay)),
            ),
            _ => Ok(()),
        }
    }
}

/// Ruin method and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuinMethodType {
    /// String removal: average removed customers, maximum string length,
    /// split rate, preserved probability.
    SISRs(i32, i32, f64, f64),
    /// Uniform random removal; one of the sizes is drawn per call.
    Random(Vec<i32>),
}

impl Default for RuinMethodType {
    fn default() -> Self {
        RuinMethodType::SISRs(36, 8, 0.740, 0.096)
    }
}

impl RuinMethodType {
    /// Select a ruin method by name. Parameters not used by the method are ignored.
    pub fn from_name(
        name: &str,
        sisrs_average_customers: i32,
        sisrs_max_length: i32,
        sisrs_split_rate: f64,
        sisrs_preserved_probability: f64,
        random_ruin_sizes: &[i32],
    ) -> Result<Self, SolverError> {
        match name {
            "SISRs" => Ok(RuinMethodType::SISRs(
                sisrs_average_customers,
                sisrs_max_length,
                sisrs_split_rate,
                sisrs_preserved_probability,
            )),
            "Random" => Ok(RuinMethodType::Random(random_ruin_sizes.to_vec())),
            _ => Err(SolverError::UnknownName {
                kind: "ruin method",
                name: name.to_string(),
            }),
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            RuinMethodType::SISRs(..) => "SISRs",
            RuinMethodType::Random(_) => "Random",
        }
    }

    fn validate(&self) -> Result<(), SolverError> {
        match self {
            RuinMethodType::SISRs(average_customers, max_length, split_rate, preserved) => {
                if *average_customers <= 0 || *max_length <= 0 {
                    return Err(SolverError::InvalidConfig(format!(
                        "SISRs average customers and max length must be positive, got {} and {}",
                        average_customers, max_length
                    )));
                }
                if !is_probability(*split_rate) || !is_probability(*preserved) {
                    return Err(SolverError::InvalidConfig(format!(
                        "SISRs rates must be in [0, 1], got {} and {}",
                        split_rate, preserved
                    )));
                }
                Ok(())
            }
            RuinMethodType::Random(sizes) => {
                if sizes.is_empty() || sizes.iter().any(|&s| s <= 0) {
                    return Err(SolverError::InvalidConfig(format!(
                        "random ruin sizes must be positive and non-empty, got {:?}",
                        sizes
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Criteria used to order removed customers before reinsertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Uniform random score.
    Random,
    /// Larger removed load first.
    Demand,
    /// Farther from the depot first.
    Far,
    /// Closer to the depot first.
    Close,
}

impl SortCriterion {
    pub fn to_str(&self) -> &'static str {
        match self {
            SortCriterion::Random => "random",
            SortCriterion::Demand => "demand",
            SortCriterion::Far => "far",
            SortCriterion::Close => "close",
        }
    }
}

impl FromStr for SortCriterion {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(SortCriterion::Random),
            "demand" => Ok(SortCriterion::Demand),
            "far" => Ok(SortCriterion::Far),
            "close" => Ok(SortCriterion::Close),
            _ => Err(SolverError::UnknownName {
                kind: "sort function",
                name: s.to_string(),
            }),
        }
    }
}

fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Configuration settings for the SDVRP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the single random stream used by the search
    pub random_seed: u32,
    /// Wall-clock budget in seconds
    pub time_limit: f64,
    /// Optional cap on ruin-and-recreate iterations
    pub max_iterations: Option<u64>,
    /// Probability of skipping an insertion position during reinsertion
    pub blink_rate: f64,
    /// Inter-route operators, applied in order
    pub inter_operators: Vec<InterOperator>,
    /// Intra-route operators, applied in order
    pub intra_operators: Vec<IntraOperator>,
    /// Acceptance rule for candidate solutions
    pub acceptance_rule_type: AcceptanceRuleType,
    /// Ruin method used to perturb the current solution
    pub ruin_method_type: RuinMethodType,
    /// Weighted criteria for ordering removed customers
    pub sorters: Vec<(SortCriterion, f64)>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            random_seed: 42,
            time_limit: 20.0,
            max_iterations: None,
            blink_rate: 0.021,
            inter_operators: vec![
                InterOperator::Relocate,
                InterOperator::Swap20,
                InterOperator::Swap21,
                InterOperator::Swap22,
                InterOperator::Cross,
                InterOperator::SwapStar,
                InterOperator::SdSwapStar,
            ],
            intra_operators: vec![IntraOperator::Exchange, IntraOperator::OrOpt1],
            acceptance_rule_type: AcceptanceRuleType::default(),
            ruin_method_type: RuinMethodType::default(),
            sorters: vec![
                (SortCriterion::Random, 0.078),
                (SortCriterion::Demand, 0.225),
                (SortCriterion::Far, 0.942),
                (SortCriterion::Close, 0.120),
            ],
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Build a configuration from strategy names, failing on the first unknown one.
    #[allow(clippy::too_many_arguments)]
    pub fn from_names(
        random_seed: u32,
        time_limit: f64,
        blink_rate: f64,
        inter_operators: &[&str],
        intra_operators: &[&str],
        acceptance_rule_type: AcceptanceRuleType,
        ruin_method_type: RuinMethodType,
        sorters: &[(&str, f64)],
    ) -> Result<Self, SolverError> {
        let config = Config {
            random_seed,
            time_limit,
            max_iterations: None,
            blink_rate,
            inter_operators: inter_operators
                .iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?,
            intra_operators: intra_operators
                .iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?,
            acceptance_rule_type,
            ruin_method_type,
            sorters: sorters
                .iter()
                .map(|&(name, weight)| Ok((name.parse()?, weight)))
                .collect::<Result<_, SolverError>>()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter range.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.time_limit >= 0.0) {
            return Err(SolverError::InvalidConfig(format!(
                "time limit must be non-negative, got {}",
                self.time_limit
            )));
        }
        if !is_probability(self.blink_rate) {
            return Err(SolverError::InvalidConfig(format!(
                "blink rate must be in [0, 1], got {}",
                self.blink_rate
            )));
        }
        if let Some(&(criterion, weight)) = self.sorters.iter().find(|(_, w)| !w.is_finite()) {
            return Err(SolverError::InvalidConfig(format!(
                "weight of sorter {} must be finite, got {}",
                criterion.to_str(),
                weight
            )));
        }
        self.acceptance_rule_type.validate()?;
        self.ruin_method_type.validate()?;
        Ok(())
    }

    /// The time limit as a duration; infinite or huge limits saturate.
    pub fn time_limit_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit).unwrap_or(Duration::MAX)
    }

    /// Set the random seed.
    pub fn with_random_seed(mut self, seed: u32) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the blink rate.
    pub fn with_blink_rate(mut self, rate: f64) -> Self {
        self.blink_rate = rate;
        self
    }

    /// Set the inter-route operators.
    pub fn with_inter_operators(mut self, operators: Vec<InterOperator>) -> Self {
        self.inter_operators = operators;
        self
    }

    /// Set the intra-route operators.
    pub fn with_intra_operators(mut self, operators: Vec<IntraOperator>) -> Self {
        self.intra_operators = operators;
        self
    }

    /// Set the acceptance rule.
    pub fn with_acceptance_rule(mut self, rule: AcceptanceRuleType) -> Self {
        self.acceptance_rule_type = rule;
        self
    }

    /// Set the ruin method.
    pub fn with_ruin_method(mut self, method: RuinMethodType) -> Self {
        self.ruin_method_type = method;
        self
    }

    /// Set the sorters.
    pub fn with_sorters(mut self, sorters: Vec<(SortCriterion, f64)>) -> Self {
        self.sorters = sorters;
        self
    }
}
