// ===== fmmforge/src/reduction/moves.rs =====
use crate::matrix::{FmmMatrix, CAPACITY_INCREMENT};
use serde::Serialize;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    #[inline(always)]
    pub fn value(self) -> i32 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }

    /// Whether `e1` and `e2` cancel into a variable `row1 (+/-) row2`.
    #[inline(always)]
    pub fn matches(self, e1: i32, e2: i32) -> bool {
        match self {
            Sign::Plus => e1 == e2,
            Sign::Minus => e1 == -e2,
        }
    }
}

/// Substitution `t = row r1 (+/-) row r2`, with `r1 < r2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub r1: usize,
    pub r2: usize,
    pub sign: Sign,
}

impl Move {
    pub fn new(r1: usize, r2: usize, sign: Sign) -> Self {
        Self { r1, r2, sign }
    }
}

/// Introduces the substitution variable for `mv` and cancels every column
/// where the two rows carry the matching pattern.
///
/// Panics when `r1 < r2 < rows + t` does not hold.
pub fn apply(matrix: &mut FmmMatrix, mv: Move) {
    let Move { r1, r2, sign } = mv;
    assert!(
        r1 < r2 && r2 < matrix.logical_rows(),
        "apply: unexpected rows r1 = {}, r2 = {} with {} logical rows",
        r1,
        r2,
        matrix.logical_rows()
    );

    if matrix.t() == matrix.t_capacity() {
        matrix.increase_capacity(CAPACITY_INCREMENT);
    }

    let new_col = matrix.logical_cols();
    let new_row = matrix.logical_rows();
    matrix.set(r1, new_col, 1);
    matrix.set(r2, new_col, sign.value());

    for i in 0..new_col {
        let e1 = matrix.get(r1, i);
        if e1 == 0 {
            continue;
        }
        let e2 = matrix.get(r2, i);
        if e2 == 0 {
            continue;
        }
        if sign.matches(e1, e2) {
            matrix.set(r1, i, 0);
            matrix.set(r2, i, 0);
            matrix.set(new_row, i, e1);
        }
    }

    matrix.set_t(matrix.t() + 1);
}

/// Removes the most recent substitution variable and restores the entries it
/// cancelled. Returns the move that was undone.
///
/// Panics when `t == 0` or the last column is not a valid move definition.
pub fn undo(matrix: &mut FmmMatrix) -> Move {
    assert!(matrix.t() > 0, "undo: no substitution to undo");
    let t = matrix.t() - 1;
    let row_t = matrix.rows() + t;
    let col_t = matrix.cols() + t;

    let defining: Vec<(usize, i32)> = (0..row_t)
        .map(|i| (i, matrix.get(i, col_t)))
        .filter(|&(_, e)| e != 0)
        .collect();
    assert!(
        defining.len() == 2,
        "undo: substitution column {} has {} entries, expected 2",
        col_t,
        defining.len()
    );
    let (r1, e1) = defining[0];
    let (r2, e2) = defining[1];
    assert!(e1 == 1, "undo: unexpected move entry {} at row {} (not +1)", e1, r1);
    let sign = match e2 {
        1 => Sign::Plus,
        -1 => Sign::Minus,
        _ => panic!("undo: unexpected move entry {} at row {}", e2, r2),
    };

    matrix.set(r1, col_t, 0);
    matrix.set(r2, col_t, 0);

    for i in 0..col_t {
        let e1 = matrix.get(row_t, i);
        if e1 == 0 {
            continue;
        }
        matrix.set(row_t, i, 0);
        matrix.set(r1, i, e1);
        matrix.set(r2, i, sign.value() * e1);
    }

    matrix.set_t(t);
    Move::new(r1, r2, sign)
}

/// Undoes every substitution, recovering the naive expressions.
pub fn back_substitute(matrix: &mut FmmMatrix) {
    while matrix.t() > 0 {
        undo(matrix);
    }
}

/// A move applied for the lifetime of the guard. Dropping the guard undoes it,
/// so the matrix is restored on every exit path of the enclosing scope.
pub struct MoveGuard<'a> {
    matrix: &'a mut FmmMatrix,
    mv: Move,
}

impl<'a> MoveGuard<'a> {
    pub fn apply(matrix: &'a mut FmmMatrix, mv: Move) -> Self {
        apply(matrix, mv);
        Self { matrix, mv }
    }

    pub fn applied(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = FmmMatrix;
    fn deref(&self) -> &FmmMatrix {
        self.matrix
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut FmmMatrix {
        self.matrix
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        let undone = undo(self.matrix);
        debug_assert_eq!(undone, self.mv, "guard restored a different move");
    }
}
