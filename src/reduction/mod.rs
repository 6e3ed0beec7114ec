pub mod brute_force;
pub mod greedy;
pub mod moves;
pub mod overlap;
pub mod sweep;

use self::brute_force::SearchStats;
use self::greedy::Heuristic;
use self::sweep::{SweepOutcome, SweepRange};
use crate::algorithm::{FmmAlgorithm, MatrixRole};
use crate::error::{FmmError, FmmResult};
use crate::matrix::FmmMatrix;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Which search reduces a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Strategy {
    Vanilla,
    Potential { k1: i64, k2: i64 },
    PotentialSweep(SweepRange),
    BruteForce,
}

impl Strategy {
    /// Checks weights and ranges before any matrix is touched.
    pub fn validate(&self) -> FmmResult<()> {
        match self {
            Strategy::Potential { k1, k2 } => {
                if *k1 < 1 || *k2 < 0 {
                    return Err(FmmError::Config(format!(
                        "potential weights need k1 >= 1 and k2 >= 0, got k1 = {}, k2 = {}",
                        k1, k2
                    )));
                }
                if *k1 > greedy::MAX_WEIGHT || *k2 > greedy::MAX_WEIGHT {
                    return Err(FmmError::Config(format!(
                        "potential weights must not exceed {}, got k1 = {}, k2 = {}",
                        greedy::MAX_WEIGHT,
                        k1,
                        k2
                    )));
                }
                Ok(())
            }
            Strategy::PotentialSweep(range) => range.validate(),
            Strategy::Vanilla | Strategy::BruteForce => Ok(()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Vanilla => "greedy vanilla",
            Strategy::Potential { .. } => "greedy potential",
            Strategy::PotentialSweep(_) => "greedy potential (sweep)",
            Strategy::BruteForce => "brute force",
        }
    }
}

/// What one matrix reduction did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionReport {
    pub strategy: Strategy,
    pub additions_before: usize,
    pub additions_after: usize,
    pub substitutions: usize,
    /// Potential weights in effect (chosen by the sweep when sweeping).
    pub weights: Option<(i64, i64)>,
    pub sweep: Option<SweepOutcome>,
    pub search: Option<SearchStats>,
    pub elapsed: Duration,
}

impl ReductionReport {
    pub fn saved(&self) -> usize {
        self.additions_before - self.additions_after
    }
}

/// Reduces `matrix` in place with `strategy`.
pub fn reduce_matrix(matrix: &mut FmmMatrix, strategy: &Strategy) -> FmmResult<ReductionReport> {
    strategy.validate()?;
    let start = Instant::now();
    let additions_before = matrix.num_additions();

    let mut report = ReductionReport {
        strategy: *strategy,
        additions_before,
        additions_after: additions_before,
        substitutions: 0,
        weights: None,
        sweep: None,
        search: None,
        elapsed: Duration::ZERO,
    };

    match strategy {
        Strategy::Vanilla => {
            greedy::reduce(matrix, Heuristic::Vanilla);
        }
        Strategy::Potential { k1, k2 } => {
            greedy::reduce(matrix, Heuristic::Potential { k1: *k1, k2: *k2 });
            report.weights = Some((*k1, *k2));
        }
        Strategy::PotentialSweep(range) => {
            let outcome = sweep::run_sweep(matrix, range)?;
            report.weights = Some((outcome.k1, outcome.k2));
            report.sweep = Some(outcome);
        }
        Strategy::BruteForce => {
            let outcome = brute_force::reduce(matrix);
            report.search = Some(outcome.stats);
        }
    }

    report.additions_after = matrix.num_additions();
    report.substitutions = matrix.t();
    report.elapsed = start.elapsed();
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleReport {
    pub role: MatrixRole,
    #[serde(flatten)]
    pub report: ReductionReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmReport {
    pub name: String,
    pub roles: Vec<RoleReport>,
}

impl AlgorithmReport {
    pub fn additions_before(&self) -> usize {
        self.roles.iter().map(|r| r.report.additions_before).sum()
    }

    pub fn additions_after(&self) -> usize {
        self.roles.iter().map(|r| r.report.additions_after).sum()
    }

    pub fn elapsed(&self) -> Duration {
        self.roles.iter().map(|r| r.report.elapsed).sum()
    }
}

/// Reduces A, B and C independently; `strategy_for` picks the strategy per matrix.
pub fn reduce_algorithm<F>(alg: &mut FmmAlgorithm, mut strategy_for: F) -> FmmResult<AlgorithmReport>
where
    F: FnMut(MatrixRole) -> FmmResult<Strategy>,
{
    let mut roles = Vec::with_capacity(3);
    for role in [MatrixRole::A, MatrixRole::B, MatrixRole::C] {
        let strategy = strategy_for(role)?;
        let report = reduce_matrix(alg.matrix_mut(role), &strategy)?;
        info!(
            %role,
            strategy = strategy.label(),
            before = report.additions_before,
            after = report.additions_after,
            "matrix reduced"
        );
        roles.push(RoleReport { role, report });
    }
    Ok(AlgorithmReport {
        name: alg.name.clone(),
        roles,
    })
}
