use super::moves::Sign;
use crate::matrix::{FmmMatrix, CAPACITY_INCREMENT};

/// Number of columns where rows `r1` and `r2` carry the same nonzero value
/// (`pp`, the `+` pattern) and exactly opposite values (`nn`, the `-` pattern).
///
/// A substitution matching `s` columns saves `s - 1` additions.
pub fn overlap_score(matrix: &FmmMatrix, r1: usize, r2: usize) -> (i32, i32) {
    let mut pp = 0;
    let mut nn = 0;
    for (&e1, &e2) in matrix.row(r1).iter().zip(matrix.row(r2)) {
        if e1 == 0 || e2 == 0 {
            continue;
        }
        if e1 == e2 {
            pp += 1;
        } else if e1 == -e2 {
            nn += 1;
        }
    }
    (pp, nn)
}

/// Additions saved by a move with overlap `score`.
#[inline(always)]
pub fn savings(score: i32) -> i64 {
    if score < 2 {
        0
    } else {
        (score - 1) as i64
    }
}

/// Total savings available over every row pair, scored from scratch.
pub fn total_potential(matrix: &FmmMatrix) -> i64 {
    let n = matrix.logical_rows();
    let mut s = 0;
    for i in 0..n {
        for j in i + 1..n {
            let (p, q) = overlap_score(matrix, i, j);
            s += savings(p) + savings(q);
        }
    }
    s
}

/// Pairwise overlap scores for every row pair of a matrix under reduction.
///
/// Stored as a square matrix: `(i, j)` with `i < j` holds the `+` score,
/// `(j, i)` the `-` score. It grows by one row/column per accepted move.
#[derive(Debug, Clone)]
pub struct OverlapCache {
    values: FmmMatrix,
}

impl OverlapCache {
    pub fn new(matrix: &FmmMatrix) -> Self {
        let n = matrix.logical_rows();
        let mut values = FmmMatrix::new(n, n, matrix.t_capacity());
        for i in 0..n {
            for j in i + 1..n {
                let (p, q) = overlap_score(matrix, i, j);
                values.set(i, j, p);
                values.set(j, i, q);
            }
        }
        Self { values }
    }

    /// Number of rows (and row ids) currently covered.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.logical_rows()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached `(pp, nn)` for `i < j`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> (i32, i32) {
        (self.values.get(i, j), self.values.get(j, i))
    }

    #[inline(always)]
    pub fn score(&self, i: usize, j: usize, sign: Sign) -> i32 {
        match sign {
            Sign::Plus => self.values.get(i, j),
            Sign::Minus => self.values.get(j, i),
        }
    }

    fn refresh(&mut self, matrix: &FmmMatrix, i: usize, j: usize) {
        assert!(i < j, "refresh: unexpected pair ({}, {})", i, j);
        let (p, q) = overlap_score(matrix, i, j);
        self.values.set(i, j, p);
        self.values.set(j, i, q);
    }

    /// Patches the cache after `matrix` accepted the move on `(r1, r2)`,
    /// which appended one new row.
    pub fn record_move(&mut self, matrix: &FmmMatrix, r1: usize, r2: usize) {
        if self.values.t() == self.values.t_capacity() {
            self.values.increase_capacity(CAPACITY_INCREMENT);
        }
        self.values.set_t(self.values.t() + 1);

        let n = self.len();
        debug_assert_eq!(n, matrix.logical_rows(), "cache and matrix out of step");
        let new_row = n - 1;

        // Rows whose overlap with the new variable row may now be nonzero.
        let mut touched = vec![false; new_row];
        for i in 0..new_row {
            for j in i + 1..new_row {
                if i != r1 && j != r1 && i != r2 && j != r2 {
                    continue;
                }
                let (p, q) = self.get(i, j);
                if p > 1 || q > 1 {
                    self.refresh(matrix, i, j);
                    if i != r1 && i != r2 {
                        touched[i] = true;
                    }
                    if j != r1 && j != r2 {
                        touched[j] = true;
                    }
                }
            }
        }
        for (i, _) in touched.iter().enumerate().filter(|(_, &t)| t) {
            self.refresh(matrix, i, new_row);
        }
    }

    /// Total savings over every pair after the (already applied) speculative
    /// move on `(r1, r2)`, reusing cached scores for pairs the move cannot
    /// have changed. The cache itself still describes the matrix before the move.
    pub fn potential_after_move(&self, matrix: &FmmMatrix, r1: usize, r2: usize) -> i64 {
        let old_rows = self.len();
        debug_assert_eq!(old_rows + 1, matrix.logical_rows(), "expected one speculative move");
        let new_row = old_rows;

        let mut s = 0;
        let mut touched = vec![false; old_rows];
        for i in 0..old_rows {
            for j in i + 1..old_rows {
                let (mut p, mut q) = self.get(i, j);
                let affected = i == r1 || j == r1 || i == r2 || j == r2;
                if affected && (p > 1 || q > 1) {
                    (p, q) = overlap_score(matrix, i, j);
                    if i != r1 && i != r2 {
                        touched[i] = true;
                    }
                    if j != r1 && j != r2 {
                        touched[j] = true;
                    }
                }
                s += savings(p) + savings(q);
            }
        }
        for (i, _) in touched.iter().enumerate().filter(|(_, &t)| t) {
            let (p, q) = overlap_score(matrix, i, new_row);
            s += savings(p) + savings(q);
        }
        s
    }
}
