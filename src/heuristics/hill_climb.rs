//! Steepest-descent hill climbing over the adjacent-swap neighborhood.

use crate::heuristics::neighborhood::{adjacent_swaps, select_best};
use crate::instance::ChainInstance;
use crate::solution::Chain;
use log::{debug, warn};

/// Trait for local search improvement methods
pub trait LocalSearch {
    fn improve(&self, instance: &ChainInstance, chain: &mut Chain) -> bool;
    fn name(&self) -> &str;
}

/// Full-neighborhood steepest hill climber.
///
/// Every iteration evaluates the entire adjacent-swap neighborhood and moves
/// to the best feasible neighbor, but only on strict improvement. A tie or
/// a worse best neighbor means the chain is a local optimum and the climb
/// stops. Cost strictly decreases on every accepted move, so the loop
/// always terminates.
pub struct HillClimber;

impl HillClimber {
    pub fn new() -> Self {
        HillClimber
    }

    /// Run a single climbing step: inspect the whole neighborhood and move
    /// to the best feasible neighbor if it is strictly cheaper.
    ///
    /// Returns true when a move was made, false when `chain` is already a
    /// local optimum (no feasible neighbor, or none strictly better).
    pub fn step(&self, instance: &ChainInstance, chain: &mut Chain) -> bool {
        let neighbors = adjacent_swaps(&chain.sequence);

        match select_best(instance, neighbors, self.name()) {
            Some(best) if best.cost.better_than(&chain.cost) => {
                chain.sequence = best.sequence;
                chain.cost = best.cost;
                true
            }
            _ => false,
        }
    }
}

impl Default for HillClimber {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for HillClimber {
    /// Climb from `chain` to a local optimum.
    ///
    /// Precondition: the input chain is feasible and visits every machine
    /// exactly once. A chain violating that is left untouched.
    fn improve(&self, instance: &ChainInstance, chain: &mut Chain) -> bool {
        if !chain.is_feasible() || !chain.is_complete(instance) {
            warn!("hill climb requires a feasible complete chain, got {:?}", chain.cost);
            return false;
        }

        let mut steps = 0;
        while self.step(instance, chain) {
            steps += 1;
        }

        debug!("local optimum {} after {} steps", chain.cost, steps);
        chain.iterations = Some(steps);
        steps > 0
    }

    fn name(&self) -> &str {
        "HillClimbing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Cost;

    /// The 4-machine graph where A-B-C-D (cost 3) is the unique optimum
    /// up to reversal.
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
    fn test_climb_reaches_global_optimum_on_diamond() {
        let instance = diamond_instance();
        // A-C-B-D: 5 + 1 + 5 = 11
        let mut chain = Chain::from_sequence(&instance, vec![0, 2, 1, 3], "test");
        assert_eq!(chain.cost, Cost::Feasible(11.0));

        let climber = HillClimber::new();
        let improved = climber.improve(&instance, &mut chain);

        assert!(improved);
        assert_eq!(chain.cost, Cost::Feasible(3.0));
        assert!(chain.sequence == vec![0, 1, 2, 3] || chain.sequence == vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_optimum_is_a_fixed_point() {
        let instance = diamond_instance();
        let mut chain = Chain::from_sequence(&instance, vec![0, 1, 2, 3], "test");

        let climber = HillClimber::new();
        assert!(!climber.improve(&instance, &mut chain));
        assert_eq!(chain.sequence, vec![0, 1, 2, 3]);
        assert_eq!(chain.cost, Cost::Feasible(3.0));
        assert_eq!(chain.iterations, Some(0));
    }

    #[test]
    fn test_costs_strictly_decrease_step_by_step() {
        let instance = ChainInstance::reference();
        let climber = HillClimber::new();

        // C1..C12 in file order is a feasible chain of the reference table
        let mut chain = Chain::from_sequence(
            &instance,
            (0..instance.dimension).collect(),
            "test",
        );
        assert!(chain.is_feasible());

        let mut last = chain.cost.value().unwrap();
        while climber.step(&instance, &mut chain) {
            let current = chain.cost.value().expect("climb keeps the chain feasible");
            assert!(current < last);
            last = current;
        }
    }

    #[test]
    fn test_incomplete_or_infeasible_input_is_rejected() {
        let instance = diamond_instance();
        let climber = HillClimber::new();

        // missing a machine
        let mut short = Chain::from_sequence(&instance, vec![0, 1, 2], "test");
        assert!(!climber.improve(&instance, &mut short));
        assert_eq!(short.sequence, vec![0, 1, 2]);

        // infeasible start: B-C cannot be cabled here
        let sparse = ChainInstance::from_edges(
            "sparse",
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("A", "C", 1.0)],
        ).unwrap();
        let mut infeasible = Chain::from_sequence(&sparse, vec![0, 1, 2], "test");
        assert_eq!(infeasible.cost, Cost::Infeasible);
        assert!(!climber.improve(&sparse, &mut infeasible));
        assert_eq!(infeasible.sequence, vec![0, 1, 2]);
    }
}
