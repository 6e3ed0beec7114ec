// ===== fmmforge/src/reduction/greedy.rs =====
use super::moves::{apply, Move, MoveGuard, Sign};
use super::overlap::OverlapCache;
use crate::matrix::FmmMatrix;
use serde::Serialize;
use tracing::{debug, trace};

pub const DEFAULT_K1: i64 = 5;
pub const DEFAULT_K2: i64 = 1;
/// Largest accepted potential weight.
pub const MAX_WEIGHT: i64 = 1_000_000_000;

/// How candidate moves are scored by the greedy driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Heuristic {
    /// Raw overlap count.
    Vanilla,
    /// `k1 * overlap + k2 * potential`, where the potential is the total
    /// savings left in the system after the move.
    Potential { k1: i64, k2: i64 },
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::Potential {
            k1: DEFAULT_K1,
            k2: DEFAULT_K2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GreedyOutcome {
    pub steps: usize,
    pub additions_before: usize,
    pub additions_after: usize,
}

impl GreedyOutcome {
    pub fn saved(&self) -> usize {
        self.additions_before - self.additions_after
    }
}

/// One greedy reduction over a borrowed matrix. Owns the overlap cache for
/// the duration of the run.
pub struct GreedyReducer<'a> {
    matrix: &'a mut FmmMatrix,
    cache: OverlapCache,
    heuristic: Heuristic,
    steps: usize,
    converged: bool,
}

impl<'a> GreedyReducer<'a> {
    pub fn new(matrix: &'a mut FmmMatrix, heuristic: Heuristic) -> Self {
        let cache = OverlapCache::new(matrix);
        Self {
            matrix,
            cache,
            heuristic,
            steps: 0,
            converged: false,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_converged(&self) -> bool {
        self.converged
    }

    pub fn cache(&self) -> &OverlapCache {
        &self.cache
    }

    pub fn matrix(&self) -> &FmmMatrix {
        self.matrix
    }

    /// Best move under the session's heuristic together with its score.
    pub fn best_move(&mut self) -> (i64, Option<Move>) {
        match self.heuristic {
            Heuristic::Vanilla => best_move_vanilla(&self.cache),
            Heuristic::Potential { k1, k2 } => {
                best_move_potential(self.matrix, &self.cache, k1, k2)
            }
        }
    }

    /// Applies the best move if it saves at least one addition.
    /// Returns `false` once the session has converged.
    pub fn step(&mut self) -> bool {
        if self.converged {
            return false;
        }
        let (value, mv) = self.best_move();
        let mv = match mv {
            Some(mv) if value >= 2 => mv,
            _ => {
                self.converged = true;
                return false;
            }
        };

        let before = self.matrix.num_additions();
        apply(self.matrix, mv);
        self.cache.record_move(self.matrix, mv.r1, mv.r2);
        self.steps += 1;

        debug!(
            step = self.steps,
            r1 = mv.r1,
            r2 = mv.r2,
            sign = ?mv.sign,
            value,
            additions = self.matrix.num_additions(),
            "greedy step"
        );
        debug_assert!(self.matrix.num_additions() < before, "accepted move did not save");
        true
    }

    /// Runs until no move saves an addition.
    pub fn run(mut self) -> GreedyOutcome {
        let additions_before = self.matrix.num_additions();
        while self.step() {}
        trace!("reduced matrix:\n{}", self.matrix);
        GreedyOutcome {
            steps: self.steps,
            additions_before,
            additions_after: self.matrix.num_additions(),
        }
    }
}

/// Reduces `matrix` in place with `heuristic`.
pub fn reduce(matrix: &mut FmmMatrix, heuristic: Heuristic) -> GreedyOutcome {
    GreedyReducer::new(matrix, heuristic).run()
}

/// Row-major scan, `+` before `-`, first strictly greater score wins.
fn select_best<F>(rows: usize, mut score: F) -> (i64, Option<Move>)
where
    F: FnMut(usize, usize) -> (i64, i64),
{
    let mut best = 0;
    let mut best_move = None;
    for i in 0..rows {
        for j in i + 1..rows {
            let (p, n) = score(i, j);
            if p > best {
                best = p;
                best_move = Some(Move::new(i, j, Sign::Plus));
            }
            if n > best {
                best = n;
                best_move = Some(Move::new(i, j, Sign::Minus));
            }
        }
    }
    (best, best_move)
}

pub fn best_move_vanilla(cache: &OverlapCache) -> (i64, Option<Move>) {
    select_best(cache.len(), |i, j| {
        let (p, n) = cache.get(i, j);
        (p as i64, n as i64)
    })
}

pub fn best_move_potential(
    matrix: &mut FmmMatrix,
    cache: &OverlapCache,
    k1: i64,
    k2: i64,
) -> (i64, Option<Move>) {
    select_best(cache.len(), |i, j| {
        potential_scores(&mut *matrix, cache, i, j, k1, k2)
    })
}

/// Weighted `(+, -)` scores for pair `(r1, r2)`. Sides that cannot save an
/// addition keep their raw overlap.
fn potential_scores(
    matrix: &mut FmmMatrix,
    cache: &OverlapCache,
    r1: usize,
    r2: usize,
    k1: i64,
    k2: i64,
) -> (i64, i64) {
    let (pp, nn) = cache.get(r1, r2);
    let mut p = pp as i64;
    let mut n = nn as i64;
    if pp < 2 && nn < 2 {
        return (p, n);
    }

    let mut weigh = |raw: i32, sign: Sign| -> i64 {
        let potential = if k2 != 0 {
            let guard = MoveGuard::apply(&mut *matrix, Move::new(r1, r2, sign));
            let potential = cache.potential_after_move(&guard, r1, r2);
            potential
        } else {
            0
        };
        k1.saturating_mul(raw as i64)
            .saturating_add(k2.saturating_mul(potential))
    };
    if pp >= 2 {
        p = weigh(pp, Sign::Plus);
    }
    if nn >= 2 {
        n = weigh(nn, Sign::Minus);
    }
    (p, n)
}
