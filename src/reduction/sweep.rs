// ===== fmmforge/src/reduction/sweep.rs =====
use super::greedy::{self, Heuristic};
use crate::error::{FmmError, FmmResult};
use crate::matrix::FmmMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Largest denominator tried when turning a weight ratio into integers.
pub const MAX_DENOMINATOR: i64 = 200_000;

/// Largest swept alpha. Keeps `k2 <= MAX_ALPHA * MAX_DENOMINATOR` below
/// [`greedy::MAX_WEIGHT`].
pub const MAX_ALPHA: f64 = 1000.0;

#[inline(always)]
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Best fraction `n / d` with `d <= max_denominator` for a non-negative `f`,
/// reduced to lowest terms. Earlier (smaller) denominators win ties.
pub fn approximate_fraction(f: f64, max_denominator: i64) -> (i64, i64) {
    let mut best_num = round_half_up(f);
    let mut best_den = 1;
    let mut best_err = (best_num as f64 - f).abs();

    for d in 2..=max_denominator {
        let fd = f * d as f64;
        let n = round_half_up(fd);
        let err = (n as f64 - fd).abs();
        if err < best_err {
            best_err = err;
            best_num = n;
            best_den = d;
        }
    }

    for i in 2..=max_denominator / 2 {
        if i > best_den {
            break;
        }
        while best_num % i == 0 && best_den % i == 0 {
            best_num /= i;
            best_den /= i;
        }
    }
    (best_num, best_den)
}

/// Range of `alpha = k2 / k1` values tried by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub steps: usize,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            alpha_start: 0.0,
            alpha_end: 0.5,
            steps: 5,
        }
    }
}

impl SweepRange {
    pub fn new(alpha_start: f64, alpha_end: f64, steps: usize) -> FmmResult<Self> {
        let range = Self {
            alpha_start,
            alpha_end,
            steps,
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> FmmResult<()> {
        if !self.alpha_start.is_finite() || !self.alpha_end.is_finite() {
            return Err(FmmError::Config(format!(
                "alpha range must be finite, got {}..{}",
                self.alpha_start, self.alpha_end
            )));
        }
        if self.alpha_start < 0.0 {
            return Err(FmmError::Config(format!(
                "alpha_start must be non-negative, got {}",
                self.alpha_start
            )));
        }
        if self.alpha_end > MAX_ALPHA {
            return Err(FmmError::Config(format!(
                "alpha_end must not exceed {}, got {}",
                MAX_ALPHA, self.alpha_end
            )));
        }
        if self.alpha_end < self.alpha_start {
            return Err(FmmError::Config(format!(
                "alpha_end {} is below alpha_start {}",
                self.alpha_end, self.alpha_start
            )));
        }
        Ok(())
    }

    /// Sampled alpha values, both ends included.
    pub fn samples(&self) -> Vec<f64> {
        if self.steps == 0 || self.alpha_end == self.alpha_start {
            return vec![self.alpha_start];
        }
        let step = (self.alpha_end - self.alpha_start) / self.steps as f64;
        (0..=self.steps)
            .map(|i| self.alpha_start + i as f64 * step)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepSample {
    pub alpha: f64,
    pub k1: i64,
    pub k2: i64,
    pub additions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    pub k1: i64,
    pub k2: i64,
    pub additions: usize,
    pub samples: Vec<SweepSample>,
}

/// Runs the potential heuristic for every alpha in `range` on fresh copies of
/// `matrix` and leaves the best reduction in `matrix`.
pub fn run_sweep(matrix: &mut FmmMatrix, range: &SweepRange) -> FmmResult<SweepOutcome> {
    range.validate()?;

    let initial = matrix.num_additions();
    let mut best = matrix.clone();
    let mut best_additions = initial;
    let (mut best_k1, mut best_k2) = (1, 0);
    let mut samples = Vec::new();

    for alpha in range.samples() {
        let (k2, k1) = approximate_fraction(alpha, MAX_DENOMINATOR);
        let mut candidate = matrix.clone();
        let outcome = greedy::reduce(&mut candidate, Heuristic::Potential { k1, k2 });
        debug!(alpha, k1, k2, additions = outcome.additions_after, "sweep sample");

        if outcome.additions_after < best_additions {
            best_additions = outcome.additions_after;
            best_k1 = k1;
            best_k2 = k2;
            best = candidate;
        }
        samples.push(SweepSample {
            alpha,
            k1,
            k2,
            additions: outcome.additions_after,
        });
    }

    matrix.copy_from(&best);
    info!(
        from = initial,
        to = best_additions,
        k1 = best_k1,
        k2 = best_k2,
        "potential sweep finished"
    );
    Ok(SweepOutcome {
        k1: best_k1,
        k2: best_k2,
        additions: best_additions,
        samples,
    })
}
