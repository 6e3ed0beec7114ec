mod common;

use fmmforge::matrix::FmmMatrix;
use fmmforge::reduction::greedy::{self, Heuristic};
use fmmforge::reduction::moves::{apply, Move, Sign};
use fmmforge::reduction::sweep::{run_sweep, SweepRange};
use fmmforge::reduction::{brute_force, reduce_algorithm, reduce_matrix, Strategy};
use fmmforge::verifier;
use fmmforge::MatrixRole;
use rstest::rstest;

fn small_matrices() -> Vec<FmmMatrix> {
    vec![
        FmmMatrix::from_rows(
            &[
                vec![1, 1, 1, 0, 1, 0],
                vec![1, 1, 0, 1, 1, 1],
                vec![0, 1, 1, 1, 0, 1],
            ],
            0,
        ),
        FmmMatrix::from_rows(
            &[
                vec![1, -1, 1, 1, 0],
                vec![1, 1, 1, -1, 1],
                vec![-1, 1, 0, 1, 1],
                vec![1, 0, 1, 0, -1],
            ],
            2,
        ),
        FmmMatrix::from_rows(
            &[
                vec![1, 1, 1, 1],
                vec![1, 1, 1, 1],
                vec![1, 1, 0, 0],
                vec![0, 0, 1, 1],
            ],
            1,
        ),
    ]
}

#[test]
fn test_strassen_baseline() {
    let alg = common::strassen();
    assert_eq!(alg.additions(), [5, 5, 8]);
    assert_eq!(alg.total_additions(), 18);
    assert!(verifier::is_correct(&alg));
}

#[rstest]
#[case(MatrixRole::A)]
#[case(MatrixRole::B)]
#[case(MatrixRole::C)]
fn test_strassen_has_no_vanilla_saving(#[case] role: MatrixRole) {
    let mut alg = common::strassen();
    let before = alg.matrix(role).clone();
    let outcome = greedy::reduce(alg.matrix_mut(role), Heuristic::Vanilla);
    assert_eq!(outcome.steps, 0);
    assert_eq!(alg.matrix(role), &before);
}

#[test]
fn test_identical_columns_save_one() {
    // Two identical columns: a single substitution covers both.
    let mut m = FmmMatrix::from_rows(&[vec![1, 1], vec![1, 1]], 0);
    assert_eq!(m.num_additions(), 2);
    apply(&mut m, Move::new(0, 1, Sign::Plus));
    assert_eq!(m.num_additions(), 1);
    assert_eq!(m.t(), 1);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn test_zero_alpha_sweep_matches_vanilla(#[case] index: usize) {
    let original = small_matrices().swap_remove(index);

    let mut vanilla = original.clone();
    greedy::reduce(&mut vanilla, Heuristic::Vanilla);

    let mut swept = original;
    let outcome = run_sweep(&mut swept, &SweepRange::new(0.0, 0.0, 3).unwrap()).unwrap();
    assert_eq!(outcome.samples.len(), 1);
    assert_eq!(outcome.k2, 0);
    assert_eq!(swept.num_additions(), vanilla.num_additions());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn test_brute_force_not_worse_than_greedy(#[case] index: usize) {
    let original = small_matrices().swap_remove(index);

    let mut vanilla = original.clone();
    greedy::reduce(&mut vanilla, Heuristic::Vanilla);
    let mut potential = original.clone();
    greedy::reduce(&mut potential, Heuristic::default());

    let mut exhaustive = original.clone();
    let outcome = brute_force::reduce(&mut exhaustive);
    assert_eq!(outcome.additions_before, original.num_additions());
    assert_eq!(outcome.seed_additions, vanilla.num_additions());
    assert!(exhaustive.num_additions() <= vanilla.num_additions());
    assert!(exhaustive.num_additions() <= potential.num_additions());
}

#[rstest]
#[case(Strategy::Vanilla)]
#[case(Strategy::Potential { k1: 5, k2: 1 })]
#[case(Strategy::PotentialSweep(SweepRange::default()))]
#[case(Strategy::BruteForce)]
fn test_reduced_strassen_still_verifies(#[case] strategy: Strategy) {
    let mut alg = common::strassen();
    let report = reduce_algorithm(&mut alg, |_| Ok(strategy)).unwrap();
    assert_eq!(report.roles.len(), 3);
    assert_eq!(report.additions_before(), 18);
    assert!(report.additions_after() <= 18);
    assert_eq!(report.additions_after(), alg.total_additions());
    assert!(verifier::is_correct(&alg));
}

#[test]
fn test_winograd_form_vanilla_reaches_fifteen() {
    let mut alg = common::winograd();
    assert!(verifier::is_correct(&alg));
    assert_eq!(alg.additions(), [7, 7, 10]);

    let report = reduce_algorithm(&mut alg, |_| Ok(Strategy::Vanilla)).unwrap();
    assert_eq!(report.additions_before(), 24);
    assert_eq!(alg.additions(), [4, 4, 7]);
    assert_eq!(report.additions_after(), 15);
    assert!(verifier::is_correct(&alg));
}

#[rstest]
#[case(Strategy::Potential { k1: 3, k2: 1 })]
#[case(Strategy::PotentialSweep(SweepRange::default()))]
#[case(Strategy::BruteForce)]
fn test_winograd_form_other_strategies(#[case] strategy: Strategy) {
    let mut alg = common::winograd();
    let report = reduce_algorithm(&mut alg, |_| Ok(strategy)).unwrap();
    assert!(report.additions_after() < report.additions_before());
    assert!(verifier::is_correct(&alg));
    if strategy == Strategy::BruteForce {
        assert!(report.additions_after() <= 15);
    }
}

#[test]
fn test_invalid_strategy_leaves_matrix_alone() {
    let mut m = small_matrices().swap_remove(0);
    let original = m.clone();
    assert!(reduce_matrix(&mut m, &Strategy::Potential { k1: 1, k2: -1 }).is_err());
    assert_eq!(m, original);
}
