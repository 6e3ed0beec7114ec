use crate::algorithm::FmmAlgorithm;
use crate::reduction::moves::back_substitute;
use std::fmt;

/// First coefficient of the `a * b` expansion that disagrees with the
/// classical product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    /// Running index of the output entry `c_i`.
    pub output: usize,
    /// Row of A (index into the `k*l` A entries).
    pub a_index: usize,
    /// Row of B (index into the `l*m` B entries).
    pub b_index: usize,
    /// Unreduced coefficient.
    pub found: i128,
    pub expected: i128,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c{}: coefficient of a{} * b{} is {} (expected {})",
            self.output, self.a_index, self.b_index, self.found, self.expected
        )
    }
}

impl std::error::Error for Discrepancy {}

fn reduce_mod(e: i128, p: u32) -> i128 {
    if p == 0 {
        e
    } else {
        e.rem_euclid(p as i128)
    }
}

/// Checks that `alg` computes `C = A * B`, after undoing any substitutions on a copy.
pub fn verify(alg: &FmmAlgorithm) -> Result<(), Discrepancy> {
    let mut naive = alg.clone();
    back_substitute(&mut naive.a);
    back_substitute(&mut naive.b);
    back_substitute(&mut naive.c);

    let (na, nb) = (naive.na(), naive.nb());
    let (l, m) = (naive.l, naive.m);
    let mut pattern = vec![0i128; na * nb];

    for ci in 0..naive.nc() {
        pattern.fill(0);
        for mi in 0..naive.q {
            let factor = naive.c.get(mi, ci);
            if factor == 0 {
                continue;
            }
            for ai in 0..na {
                let aa = naive.a.get(ai, mi);
                if aa == 0 {
                    continue;
                }
                for bi in 0..nb {
                    let bb = naive.b.get(bi, mi);
                    pattern[ai * nb + bi] += factor as i128 * aa as i128 * bb as i128;
                }
            }
        }

        // c[row][col] = sum_i a[row][i] * b[i][col]
        let (row, col) = (ci / m, ci % m);
        for i in 0..l {
            let (ai, bi) = (l * row + i, col + i * m);
            let e = pattern[ai * nb + bi];
            if reduce_mod(e, naive.p) != 1 {
                return Err(Discrepancy {
                    output: ci,
                    a_index: ai,
                    b_index: bi,
                    found: e,
                    expected: 1,
                });
            }
            pattern[ai * nb + bi] = 0;
        }

        for ai in 0..na {
            for bi in 0..nb {
                let e = pattern[ai * nb + bi];
                if reduce_mod(e, naive.p) != 0 {
                    return Err(Discrepancy {
                        output: ci,
                        a_index: ai,
                        b_index: bi,
                        found: e,
                        expected: 0,
                    });
                }
            }
        }
    }
    Ok(())
}

pub fn is_correct(alg: &FmmAlgorithm) -> bool {
    verify(alg).is_ok()
}
