// ===== fmmforge/src/reduction/brute_force.rs =====
use super::greedy::{self, Heuristic};
use super::moves::{Move, MoveGuard, Sign};
use super::overlap::{overlap_score, total_potential};
use crate::matrix::FmmMatrix;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Search nodes entered, including pruned ones.
    pub nodes: u64,
    pub pruned: u64,
    pub max_depth: usize,
    pub improvements: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub additions_before: usize,
    /// Addition count of the greedy solution that seeded the bound.
    pub seed_additions: usize,
    pub additions_after: usize,
    pub substitutions: usize,
    pub stats: SearchStats,
}

/// Depth-first search over every sequence of saving moves, pruned by the
/// remaining potential against the best count found so far.
pub struct BranchAndBound {
    best: FmmMatrix,
    best_additions: usize,
    stats: SearchStats,
}

impl BranchAndBound {
    /// Seeds the bound with a vanilla greedy reduction of a copy of `matrix`.
    pub fn new(matrix: &FmmMatrix) -> Self {
        let mut best = matrix.clone();
        greedy::reduce(&mut best, Heuristic::Vanilla);
        let best_additions = best.num_additions();
        Self {
            best,
            best_additions,
            stats: SearchStats::default(),
        }
    }

    pub fn best(&self) -> &FmmMatrix {
        &self.best
    }

    pub fn best_additions(&self) -> usize {
        self.best_additions
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Explores from `matrix`. The matrix is restored on return.
    pub fn search(&mut self, matrix: &mut FmmMatrix, depth: usize) {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let additions = matrix.num_additions();
        let potential = total_potential(matrix) as usize;
        if additions.saturating_sub(potential) >= self.best_additions {
            self.stats.pruned += 1;
            return;
        }

        let n = matrix.logical_rows();
        for i in 0..n {
            for j in i + 1..n {
                let (p, q) = overlap_score(matrix, i, j);
                if p > 1 {
                    self.branch(matrix, Move::new(i, j, Sign::Plus), depth);
                }
                if q > 1 {
                    self.branch(matrix, Move::new(i, j, Sign::Minus), depth);
                }
            }
        }
    }

    fn branch(&mut self, matrix: &mut FmmMatrix, mv: Move, depth: usize) {
        let mut guard = MoveGuard::apply(matrix, mv);
        let additions = guard.num_additions();
        if additions < self.best_additions {
            self.best.copy_from(&guard);
            self.best_additions = additions;
            self.stats.improvements += 1;
            debug!(additions, depth, "branch-and-bound improvement");
        }
        self.search(&mut guard, depth + 1);
    }

    /// Writes the best matrix found into `matrix`.
    pub fn finish(self, matrix: &mut FmmMatrix) -> SearchStats {
        matrix.copy_from(&self.best);
        self.stats
    }
}

/// Runs a full branch-and-bound search and leaves the best reduction in `matrix`.
pub fn reduce(matrix: &mut FmmMatrix) -> SearchOutcome {
    let additions_before = matrix.num_additions();
    let mut session = BranchAndBound::new(matrix);
    let seed_additions = session.best_additions();
    info!(additions_before, seed_additions, "branch-and-bound seeded from greedy vanilla");

    session.search(matrix, 0);
    let stats = session.finish(matrix);

    info!(
        additions = matrix.num_additions(),
        nodes = stats.nodes,
        pruned = stats.pruned,
        "branch-and-bound finished"
    );
    SearchOutcome {
        additions_before,
        seed_additions,
        additions_after: matrix.num_additions(),
        substitutions: matrix.t(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_worse_than_greedy_seed() {
        let original = FmmMatrix::from_rows(
            &[
                vec![1, 1, 1, 0, 1],
                vec![1, 1, 0, 1, 1],
                vec![0, 1, 1, 1, -1],
                vec![1, 0, 1, 1, 0],
            ],
            4,
        );
        let mut vanilla = original.clone();
        let greedy = greedy::reduce(&mut vanilla, Heuristic::Vanilla);

        let mut m = original.clone();
        let outcome = reduce(&mut m);
        assert!(outcome.additions_after <= greedy.additions_after);
        assert_eq!(outcome.seed_additions, greedy.additions_after);
        assert_eq!(m.num_additions(), outcome.additions_after);
        assert!(outcome.stats.nodes >= 1);
    }

    #[test]
    fn test_search_restores_matrix() {
        let original = FmmMatrix::from_rows(&[vec![1, 1, 1], vec![1, 1, -1], vec![0, 1, 1]], 2);
        let mut m = original.clone();
        let mut session = BranchAndBound::new(&m);
        session.search(&mut m, 0);
        assert_eq!(m, original);
    }

    #[test]
    fn test_nothing_to_reduce() {
        let mut m = FmmMatrix::from_rows(&[vec![1, 0], vec![0, 1]], 0);
        let outcome = reduce(&mut m);
        assert_eq!(outcome.additions_after, 0);
        assert_eq!(outcome.substitutions, 0);
        assert_eq!(outcome.stats.pruned, 1);
    }
}
