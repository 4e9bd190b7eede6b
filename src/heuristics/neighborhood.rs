//! Adjacent-swap neighborhood: generation and best-neighbor selection.

use crate::instance::ChainInstance;
use crate::solution::Chain;

/// All orderings exactly one adjacent transposition away from `sequence`.
///
/// For each position i, the output at index i swaps positions i and i+1 of
/// the input; a sequence of length n yields n-1 variants, in ascending
/// swap-position order. That order is what the selector's tie-break keys on.
pub fn adjacent_swaps(sequence: &[usize]) -> Vec<Vec<usize>> {
    let n = sequence.len();
    let mut variants = Vec::with_capacity(n.saturating_sub(1));

    for i in 0..n.saturating_sub(1) {
        let mut neighbor = sequence.to_vec();
        neighbor.swap(i, i + 1);
        variants.push(neighbor);
    }

    variants
}

/// Evaluate candidate orderings and pick the cheapest feasible one.
///
/// Infeasible orderings are excluded from consideration entirely. Among
/// feasible ones the minimum cost wins; on a tie the earliest candidate in
/// generation order is kept, since a later candidate replaces the incumbent
/// only when strictly cheaper.
pub fn select_best(
    instance: &ChainInstance,
    sequences: Vec<Vec<usize>>,
    algorithm: &str,
) -> Option<Chain> {
    let mut best: Option<Chain> = None;

    for sequence in sequences {
        let candidate = Chain::from_sequence(instance, sequence, algorithm);
        if !candidate.is_feasible() {
            continue;
        }

        let replaces = match best {
            Some(ref incumbent) => candidate.cost.better_than(&incumbent.cost),
            None => true,
        };
        if replaces {
            best = Some(candidate);
        }
    }

    best
}
