//! Chain candidate representation.
//!
//! A `Chain` is one specific ordering of all machines plus its evaluated
//! cost. Cost is a tagged value: an ordering whose consecutive pairs cannot
//! all be cabled is `Infeasible`, never some sentinel number that could be
//! mistaken for a real cable length.

use crate::instance::ChainInstance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Evaluated cost of a chain ordering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    /// Total cable length of a fully connectable ordering
    Feasible(f64),
    /// At least one consecutive pair cannot be cabled
    Infeasible,
}

impl Cost {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, Cost::Feasible(_))
    }

    /// The cable length, if the ordering was feasible
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match *self {
            Cost::Feasible(v) => Some(v),
            Cost::Infeasible => None,
        }
    }

    /// Strict improvement: a feasible cost beats an infeasible one, a
    /// strictly smaller feasible cost beats a larger one. An infeasible
    /// cost never beats anything, so ties keep the incumbent.
    pub fn better_than(&self, other: &Cost) -> bool {
        match (*self, *other) {
            (Cost::Feasible(a), Cost::Feasible(b)) => a < b,
            (Cost::Feasible(_), Cost::Infeasible) => true,
            (Cost::Infeasible, _) => false,
        }
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Cost::Feasible(v) => write!(f, "{:.2}", v),
            Cost::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// One candidate ordering of all machines, with its cached cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// The ordering as a sequence of machine ids
    pub sequence: Vec<usize>,
    /// Evaluated total cable length (or Infeasible)
    pub cost: Cost,
    /// Algorithm that produced this chain
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of hill-climbing steps taken (if applicable)
    pub iterations: Option<usize>,
}

impl Chain {
    /// Build a chain from an ordering, evaluating its cost immediately
    pub fn from_sequence(instance: &ChainInstance, sequence: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.chain_cost(&sequence);
        Chain {
            sequence,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Re-evaluate the cached cost against the instance
    pub fn validate(&mut self, instance: &ChainInstance) {
        self.cost = instance.chain_cost(&self.sequence);
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.cost.is_feasible()
    }

    /// Check that the ordering is a permutation of all machines:
    /// every machine appears exactly once.
    pub fn is_complete(&self, instance: &ChainInstance) -> bool {
        if self.sequence.len() != instance.dimension {
            return false;
        }
        let unique: HashSet<usize> = self.sequence.iter().cloned().collect();
        unique.len() == instance.dimension
            && self.sequence.iter().all(|&m| m < instance.dimension)
    }

    /// Render the ordering with machine labels, e.g. "C1 - C2 - C10"
    pub fn format_labels(&self, instance: &ChainInstance) -> String {
        self.sequence.iter()
            .map(|&m| instance.machines[m].label.clone())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

/// Two chains are the same candidate when their orderings match;
/// cached cost and bookkeeping are not part of identity.
impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chain ({})", self.algorithm)?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Ordering: {:?}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_instance() -> ChainInstance {
        ChainInstance::from_edges(
            "line",
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "C", 2.0)],
        ).unwrap()
    }

    #[test]
    fn test_cost_comparison_never_picks_infeasible() {
        assert!(Cost::Feasible(5.0).better_than(&Cost::Feasible(7.0)));
        assert!(!Cost::Feasible(7.0).better_than(&Cost::Feasible(5.0)));
        assert!(Cost::Feasible(1e12).better_than(&Cost::Infeasible));
        assert!(!Cost::Infeasible.better_than(&Cost::Feasible(1e12)));
        assert!(!Cost::Infeasible.better_than(&Cost::Infeasible));
    }

    #[test]
    fn test_cost_ties_keep_incumbent() {
        assert!(!Cost::Feasible(3.0).better_than(&Cost::Feasible(3.0)));
    }

    #[test]
    fn test_from_sequence_caches_cost() {
        let instance = line_instance();
        let chain = Chain::from_sequence(&instance, vec![0, 1, 2], "test");
        assert_eq!(chain.cost, Cost::Feasible(3.0));

        let broken = Chain::from_sequence(&instance, vec![1, 0, 2], "test");
        assert_eq!(broken.cost, Cost::Infeasible);
    }

    #[test]
    fn test_identity_ignores_cost() {
        let instance = line_instance();
        let mut a = Chain::from_sequence(&instance, vec![0, 1, 2], "x");
        let b = Chain::from_sequence(&instance, vec![0, 1, 2], "y");
        a.cost = Cost::Infeasible;
        assert_eq!(a, b);

        let c = Chain::from_sequence(&instance, vec![2, 1, 0], "x");
        assert_ne!(a, c);
    }

    #[test]
    fn test_is_complete_catches_malformed_orderings() {
        let instance = line_instance();
        assert!(Chain::from_sequence(&instance, vec![2, 1, 0], "t").is_complete(&instance));
        // duplicate machine
        assert!(!Chain::from_sequence(&instance, vec![0, 0, 2], "t").is_complete(&instance));
        // missing machine
        assert!(!Chain::from_sequence(&instance, vec![0, 1], "t").is_complete(&instance));
        // unknown id
        assert!(!Chain::from_sequence(&instance, vec![0, 1, 7], "t").is_complete(&instance));
    }
}
