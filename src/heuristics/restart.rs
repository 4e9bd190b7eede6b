//! Multi-start driver: repeated hill climbs from random feasible orderings.

use crate::heuristics::hill_climb::{HillClimber, LocalSearch};
use crate::instance::ChainInstance;
use crate::solution::Chain;
use log::{debug, trace};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Instant;

/// Outcome of a full multi-start search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Best local optimum found; always feasible
    pub best: Chain,
    /// Number of hill climbs run
    pub restarts: usize,
    /// Whether the target cost was met within the restart budget
    pub target_reached: bool,
    /// Wall time in seconds
    pub computation_time: f64,
}

/// Reasons a search cannot produce any chain at all
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The instance has no machines or the restart budget is zero
    InvalidParameters(String),
    /// The machine set handed to the search is not a permutation
    MalformedMachineSet(String),
    /// No feasible random ordering was found within the attempt budget
    NoFeasibleStart { attempts: usize },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidParameters(msg) => write!(f, "invalid search parameters: {}", msg),
            SearchError::MalformedMachineSet(msg) => write!(f, "malformed machine set: {}", msg),
            SearchError::NoFeasibleStart { attempts } => {
                write!(f, "no feasible starting ordering found in {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Random-restart hill climbing.
///
/// Each restart shuffles the machines into a random feasible ordering and
/// climbs it to a local optimum. The search stops as soon as a local
/// optimum meets the target cost, or after `max_restarts` climbs, whichever
/// comes first; the best optimum seen is returned either way. All knobs are
/// caller-supplied, including the seed, so runs are reproducible.
pub struct RandomRestart {
    /// Stop as soon as a chain at or below this cost is found
    pub target_cost: Option<f64>,
    /// Hard cap on the number of hill climbs
    pub max_restarts: usize,
    /// Cap on shuffles when drawing a feasible starting ordering
    pub max_shuffle_attempts: usize,
    /// Random seed
    pub seed: u64,
}

impl RandomRestart {
    pub fn new(max_restarts: usize) -> Self {
        RandomRestart {
            target_cost: None,
            max_restarts,
            max_shuffle_attempts: 10_000,
            seed: 42,
        }
    }

    pub fn with_params(target_cost: Option<f64>, max_restarts: usize, seed: u64) -> Self {
        RandomRestart {
            target_cost,
            max_restarts,
            max_shuffle_attempts: 10_000,
            seed,
        }
    }

    /// Search over all machines of the instance.
    pub fn search(&self, instance: &ChainInstance) -> Result<SearchReport, SearchError> {
        let machines: Vec<usize> = (0..instance.dimension).collect();
        self.search_from(instance, &machines)
    }

    /// Search over an externally supplied machine set.
    ///
    /// The set must contain every machine of the instance exactly once;
    /// anything else fails fast before any shuffling happens.
    pub fn search_from(
        &self,
        instance: &ChainInstance,
        machines: &[usize],
    ) -> Result<SearchReport, SearchError> {
        if instance.dimension == 0 {
            return Err(SearchError::InvalidParameters("instance has no machines".to_string()));
        }
        if self.max_restarts == 0 {
            return Err(SearchError::InvalidParameters("restart budget must be positive".to_string()));
        }
        self.check_machine_set(instance, machines)?;

        let start_time = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let climber = HillClimber::new();

        let mut best: Option<Chain> = None;
        let mut restarts = 0;
        let mut target_reached = false;

        while restarts < self.max_restarts {
            let mut chain = self.random_feasible_start(instance, machines, &mut rng)?;
            climber.improve(instance, &mut chain);
            restarts += 1;
            debug!("restart {}: local optimum {}", restarts, chain.cost);

            let replaces = match best {
                Some(ref incumbent) => chain.cost.better_than(&incumbent.cost),
                None => true,
            };
            if replaces {
                best = Some(chain);
            }

            if let (Some(target), Some(incumbent)) = (self.target_cost, &best) {
                if incumbent.cost.value().is_some_and(|c| c <= target) {
                    target_reached = true;
                    break;
                }
            }
        }

        // max_restarts > 0 and every start is feasible, so a best chain exists
        let mut best = best.ok_or_else(|| {
            SearchError::InvalidParameters("no restart completed".to_string())
        })?;
        best.algorithm = "HillClimbing-Restart".to_string();
        best.computation_time = start_time.elapsed().as_secs_f64();

        Ok(SearchReport {
            best,
            restarts,
            target_reached,
            computation_time: start_time.elapsed().as_secs_f64(),
        })
    }

    fn check_machine_set(
        &self,
        instance: &ChainInstance,
        machines: &[usize],
    ) -> Result<(), SearchError> {
        if machines.len() != instance.dimension {
            return Err(SearchError::MalformedMachineSet(format!(
                "expected {} machines, got {}",
                instance.dimension,
                machines.len()
            )));
        }
        let mut seen = vec![false; instance.dimension];
        for &m in machines {
            if m >= instance.dimension {
                return Err(SearchError::MalformedMachineSet(format!("unknown machine id {}", m)));
            }
            if seen[m] {
                return Err(SearchError::MalformedMachineSet(format!("duplicate machine id {}", m)));
            }
            seen[m] = true;
        }
        Ok(())
    }

    /// Draw a uniformly random ordering, reshuffling until it is feasible.
    /// Bounded by `max_shuffle_attempts` so sparse instances cannot hang
    /// the search.
    fn random_feasible_start(
        &self,
        instance: &ChainInstance,
        machines: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Result<Chain, SearchError> {
        let mut sequence = machines.to_vec();

        for attempt in 1..=self.max_shuffle_attempts {
            sequence.shuffle(rng);
            let chain = Chain::from_sequence(instance, sequence.clone(), "random-start");
            if chain.is_feasible() {
                trace!("feasible start after {} shuffles: {}", attempt, chain.cost);
                return Ok(chain);
            }
        }

        Err(SearchError::NoFeasibleStart {
            attempts: self.max_shuffle_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Cost;

    fn diamond_instance() -> ChainInstance {
        ChainInstance::from_edges(
            "diamond",
            &["A", "B", "C", "D"],
            &[
                ("A", "B", 1.0),
                ("B", "C", 1.0),
                ("C", "D", 1.0),
                ("A", "C", 5.0),
                ("B", "D", 5.0),
                ("A", "D", 10.0),
            ],
        ).unwrap()
    }

    #[test]
    fn test_target_stops_the_search() {
        let instance = diamond_instance();
        let driver = RandomRestart::with_params(Some(3.0), 200, 7);

        let report = driver.search(&instance).unwrap();
        assert!(report.target_reached);
        assert!(report.restarts <= 200);
        assert_eq!(report.best.cost, Cost::Feasible(3.0));
    }

    #[test]
    fn test_budget_exhaustion_returns_best_found() {
        let instance = diamond_instance();
        // unreachable target: the cheapest chain costs 3
        let driver = RandomRestart::with_params(Some(1.0), 25, 1);

        let report = driver.search(&instance).unwrap();
        assert!(!report.target_reached);
        assert_eq!(report.restarts, 25);
        assert!(report.best.is_feasible());
    }

    #[test]
    fn test_result_is_never_infeasible() {
        let instance = ChainInstance::reference();
        for seed in 0..5 {
            let driver = RandomRestart::with_params(None, 3, seed);
            let report = driver.search(&instance).unwrap();
            assert!(report.best.is_feasible());
            assert!(report.best.is_complete(&instance));
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let instance = ChainInstance::reference();
        let a = RandomRestart::with_params(None, 4, 99).search(&instance).unwrap();
        let b = RandomRestart::with_params(None, 4, 99).search(&instance).unwrap();
        assert_eq!(a.best.sequence, b.best.sequence);
        assert_eq!(a.best.cost, b.best.cost);
        assert_eq!(a.restarts, b.restarts);
    }

    #[test]
    fn test_single_machine_chain() {
        let instance = ChainInstance::from_edges("solo", &["A"], &[]).unwrap();
        let report = RandomRestart::new(1).search(&instance).unwrap();
        assert_eq!(report.best.cost, Cost::Feasible(0.0));
        assert_eq!(report.best.sequence, vec![0]);
    }

    #[test]
    fn test_no_feasible_start_is_reported() {
        // C is isolated, so no complete ordering can be cabled
        let instance = ChainInstance::from_edges(
            "isolated",
            &["A", "B", "C"],
            &[("A", "B", 1.0)],
        ).unwrap();

        let mut driver = RandomRestart::new(5);
        driver.max_shuffle_attempts = 50;

        match driver.search(&instance) {
            Err(SearchError::NoFeasibleStart { attempts }) => assert_eq!(attempts, 50),
            other => panic!("expected NoFeasibleStart, got {:?}", other.map(|r| r.best.cost)),
        }
    }

    #[test]
    fn test_malformed_machine_sets_fail_fast() {
        let instance = diamond_instance();
        let driver = RandomRestart::new(5);

        assert!(matches!(
            driver.search_from(&instance, &[0, 1, 2]),
            Err(SearchError::MalformedMachineSet(_))
        ));
        assert!(matches!(
            driver.search_from(&instance, &[0, 1, 2, 2]),
            Err(SearchError::MalformedMachineSet(_))
        ));
        assert!(matches!(
            driver.search_from(&instance, &[0, 1, 2, 9]),
            Err(SearchError::MalformedMachineSet(_))
        ));
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let instance = diamond_instance();
        let driver = RandomRestart::new(0);
        assert!(matches!(
            driver.search(&instance),
            Err(SearchError::InvalidParameters(_))
        ));
    }
}
