use crate::matrix::FmmMatrix;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Which of the three coefficient matrices of a bilinear algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum MatrixRole {
    A,
    B,
    C,
}

/// A bilinear matrix multiplication scheme `(k x l) * (l x m)` using `q` products.
///
/// `a` is `(k*l) x q` and `b` is `(l*m) x q`: column `i` holds the linear
/// forms multiplied in product `M_i`. `c` is `q x (k*m)`: column `j` is the
/// combination of products that yields output entry `c_j`. `p == 0` means the
/// scheme is over the integers, `p > 0` means over `Z_p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmmAlgorithm {
    pub name: String,
    pub p: u32,
    pub k: usize,
    pub l: usize,
    pub m: usize,
    pub q: usize,
    pub a: FmmMatrix,
    pub b: FmmMatrix,
    pub c: FmmMatrix,
}

impl FmmAlgorithm {
    /// Zero-filled algorithm with the matrix shapes implied by `(k, l, m, q)`.
    pub fn new(
        name: &str,
        p: u32,
        k: usize,
        l: usize,
        m: usize,
        q: usize,
        t_capacity: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            p,
            k,
            l,
            m,
            q,
            a: FmmMatrix::new(k * l, q, t_capacity),
            b: FmmMatrix::new(l * m, q, t_capacity),
            c: FmmMatrix::new(q, k * m, t_capacity),
        }
    }

    #[inline(always)]
    pub fn na(&self) -> usize {
        self.k * self.l
    }

    #[inline(always)]
    pub fn nb(&self) -> usize {
        self.l * self.m
    }

    #[inline(always)]
    pub fn nc(&self) -> usize {
        self.k * self.m
    }

    pub fn matrix(&self, role: MatrixRole) -> &FmmMatrix {
        match role {
            MatrixRole::A => &self.a,
            MatrixRole::B => &self.b,
            MatrixRole::C => &self.c,
        }
    }

    pub fn matrix_mut(&mut self, role: MatrixRole) -> &mut FmmMatrix {
        match role {
            MatrixRole::A => &mut self.a,
            MatrixRole::B => &mut self.b,
            MatrixRole::C => &mut self.c,
        }
    }

    /// Per-matrix addition counts `[A, B, C]`.
    pub fn additions(&self) -> [usize; 3] {
        [
            self.a.num_additions(),
            self.b.num_additions(),
            self.c.num_additions(),
        ]
    }

    pub fn total_additions(&self) -> usize {
        self.additions().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_shapes_follow_klmq() {
        let alg = FmmAlgorithm::new("X", 0, 2, 3, 4, 20, 10);
        assert_eq!((alg.a.rows(), alg.a.cols()), (6, 20));
        assert_eq!((alg.b.rows(), alg.b.cols()), (12, 20));
        assert_eq!((alg.c.rows(), alg.c.cols()), (20, 8));
        assert_eq!(alg.total_additions(), 0);
    }

    #[test]
    fn test_role_access() {
        let mut alg = FmmAlgorithm::new("X", 0, 2, 2, 2, 7, 10);
        for role in MatrixRole::iter() {
            alg.matrix_mut(role).set(0, 0, 1);
            assert_eq!(alg.matrix(role).get(0, 0), 1, "role {}", role);
        }
    }
}
