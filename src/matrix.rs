// ===== fmmforge/src/matrix.rs =====
use std::fmt;

/// Number of substitution slots added whenever the t-space runs full.
pub const CAPACITY_INCREMENT: usize = 10;

/// Growable integer matrix with a fixed core and an appendable t-space.
///
/// The logical shape is `(rows + t) x (cols + t)`. Column `cols + k` holds the
/// definition of substitution variable `k`, row `rows + k` holds the entries
/// that were cancelled out of earlier rows when `k` was introduced. Storage
/// always spans `(rows + t_capacity) x (cols + t_capacity)` and every cell
/// outside the logical shape is zero.
#[derive(Debug, Clone)]
pub struct FmmMatrix {
    rows: usize,
    cols: usize,
    t: usize,
    t_capacity: usize,
    entries: Vec<Vec<i32>>,
}

impl FmmMatrix {
    pub fn new(rows: usize, cols: usize, t_capacity: usize) -> Self {
        Self {
            rows,
            cols,
            t: 0,
            t_capacity,
            entries: vec![vec![0; cols + t_capacity]; rows + t_capacity],
        }
    }

    /// Builds a core-only matrix from row slices. All rows must share one length.
    pub fn from_rows(data: &[Vec<i32>], t_capacity: usize) -> Self {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        let mut m = Self::new(rows, cols, t_capacity);
        for (i, row) in data.iter().enumerate() {
            assert_eq!(row.len(), cols, "from_rows: ragged input at row {}", i);
            m.entries[i][..cols].copy_from_slice(row);
        }
        m
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn t(&self) -> usize {
        self.t
    }

    #[inline(always)]
    pub fn t_capacity(&self) -> usize {
        self.t_capacity
    }

    /// Current number of logical rows (`rows + t`).
    #[inline(always)]
    pub fn logical_rows(&self) -> usize {
        self.rows + self.t
    }

    /// Current number of logical columns (`cols + t`).
    #[inline(always)]
    pub fn logical_cols(&self) -> usize {
        self.cols + self.t
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.entries[row][col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.entries[row][col] = value;
    }

    /// Logical row `row` as a slice over the logical columns.
    #[inline(always)]
    pub fn row(&self, row: usize) -> &[i32] {
        &self.entries[row][..self.cols + self.t]
    }

    pub(crate) fn set_t(&mut self, t: usize) {
        assert!(t <= self.t_capacity, "set_t: t = {} exceeds capacity {}", t, self.t_capacity);
        self.t = t;
    }

    /// Grows the t-space by `delta` slots. Existing values are kept, new cells are zero.
    pub fn increase_capacity(&mut self, delta: usize) {
        let new_col_dim = self.cols + self.t_capacity + delta;
        for row in &mut self.entries {
            row.resize(new_col_dim, 0);
        }
        let new_row_dim = self.rows + self.t_capacity + delta;
        self.entries.resize_with(new_row_dim, || vec![0; new_col_dim]);
        self.t_capacity += delta;
    }

    /// Deep copy of `src` into `self`, reshaping `self` when the core dimensions differ.
    pub fn copy_from(&mut self, src: &FmmMatrix) {
        if self.rows != src.rows || self.cols != src.cols {
            *self = FmmMatrix::new(src.rows, src.cols, src.t_capacity);
        }
        if self.t_capacity < src.t_capacity {
            self.increase_capacity(src.t_capacity - self.t_capacity);
        }
        self.fill(0);
        for (dst_row, src_row) in self.entries.iter_mut().zip(&src.entries) {
            dst_row[..src_row.len()].copy_from_slice(src_row);
        }
        self.t = src.t;
    }

    /// Sets every allocated cell, including unused capacity.
    pub fn fill(&mut self, value: i32) {
        for row in &mut self.entries {
            row.fill(value);
        }
    }

    /// Number of nonzero entries in `col` among the logical rows.
    pub fn column_weight(&self, col: usize) -> usize {
        self.entries[..self.logical_rows()]
            .iter()
            .filter(|r| r[col] != 0)
            .count()
    }

    pub fn additions_at(&self, col: usize) -> usize {
        self.column_weight(col).saturating_sub(1)
    }

    /// Additions and subtractions needed to evaluate every logical column.
    pub fn num_additions(&self) -> usize {
        (0..self.logical_cols()).map(|c| self.additions_at(c)).sum()
    }

    /// Counts rows where both columns are nonzero and equal, resp. exactly opposite.
    pub fn column_matches(&self, col1: usize, col2: usize) -> (usize, usize) {
        let mut same = 0;
        let mut opposite = 0;
        for r in &self.entries[..self.logical_rows()] {
            let (e1, e2) = (r[col1], r[col2]);
            if e1 != 0 && e2 != 0 {
                if e1 == e2 {
                    same += 1;
                } else if e1 == -e2 {
                    opposite += 1;
                }
            }
        }
        (same, opposite)
    }

    /// Cell lookup that treats anything outside the allocation as zero.
    fn get_or_zero(&self, row: usize, col: usize) -> i32 {
        self.entries
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }
}

// Capacity is an allocation detail, not part of a matrix's identity.
impl PartialEq for FmmMatrix {
    fn eq(&self, other: &Self) -> bool {
        if self.rows != other.rows || self.cols != other.cols || self.t != other.t {
            return false;
        }
        let row_dim = self.entries.len().max(other.entries.len());
        let col_dim = self.cols + self.t_capacity.max(other.t_capacity);
        (0..row_dim).all(|i| (0..col_dim).all(|j| self.get_or_zero(i, j) == other.get_or_zero(i, j)))
    }
}

impl Eq for FmmMatrix {}

/// Compact text form: core block, then a separator line and `|` column
/// separator once the t-space starts.
impl fmt::Display for FmmMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.logical_rows() {
            if i == self.rows {
                writeln!(f, "{}", "-".repeat((self.logical_cols() + 1) * 3))?;
            }
            for j in 0..self.logical_cols() {
                if j == self.cols {
                    write!(f, "  |")?;
                }
                write!(f, " {:2}", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
