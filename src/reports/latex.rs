use fmmforge::{FmmAlgorithm, FmmMatrix};
use std::fmt::Write;

/// Symbols for the core rows and substitution rows of one matrix.
struct Symbols {
    core: &'static str,
    subst: &'static str,
}

const A_SYMBOLS: Symbols = Symbols { core: "A", subst: "t" };
const B_SYMBOLS: Symbols = Symbols { core: "B", subst: "u" };
const C_SYMBOLS: Symbols = Symbols { core: "M", subst: "v" };

fn push_term(out: &mut String, coeff: i32, symbol: &str, index: usize, first: bool) {
    if coeff == 0 {
        return;
    }
    if coeff < 0 {
        out.push('-');
    } else if !first {
        out.push('+');
    }
    if coeff.abs() > 1 {
        let _ = write!(out, "{}", coeff.abs());
    }
    let _ = write!(out, "{}_{{{}}}", symbol, index);
}

/// Linear combination held in `col`, over core rows and substitution rows.
fn push_column(out: &mut String, matrix: &FmmMatrix, col: usize, sym: &Symbols, parens: bool) {
    let weight = matrix.column_weight(col);
    if weight == 0 {
        out.push('0');
        return;
    }
    let wrap = parens && weight > 1;
    if wrap {
        out.push('(');
    }
    let mut first = true;
    for i in 0..matrix.logical_rows() {
        let e = matrix.get(i, col);
        if e == 0 {
            continue;
        }
        if i < matrix.rows() {
            push_term(out, e, sym.core, i, first);
        } else {
            push_term(out, e, sym.subst, i - matrix.rows(), first);
        }
        first = false;
    }
    if wrap {
        out.push(')');
    }
}

fn push_substitutions(out: &mut String, matrix: &FmmMatrix, sym: &Symbols) {
    for k in 0..matrix.t() {
        let _ = write!(out, "{}_{{{}}} &=& ", sym.subst, k);
        push_column(out, matrix, matrix.cols() + k, sym, false);
        out.push_str("\\\\\n");
    }
}

/// `eqnarray*` listing substitutions, products `M_i` and outputs `C_j`.
pub fn render_algorithm(alg: &FmmAlgorithm) -> String {
    let mut out = String::from("\\begin{eqnarray*}\n");
    push_substitutions(&mut out, &alg.a, &A_SYMBOLS);
    push_substitutions(&mut out, &alg.b, &B_SYMBOLS);
    push_substitutions(&mut out, &alg.c, &C_SYMBOLS);

    for i in 0..alg.q {
        let _ = write!(out, "M_{{{}}} &=& ", i);
        push_column(&mut out, &alg.a, i, &A_SYMBOLS, true);
        out.push_str("\\times{}");
        push_column(&mut out, &alg.b, i, &B_SYMBOLS, true);
        out.push_str("\\\\\n");
    }
    for j in 0..alg.c.cols() {
        let _ = write!(out, "C_{{{}}} &=& ", j);
        push_column(&mut out, &alg.c, j, &C_SYMBOLS, false);
        out.push_str("\\\\\n");
    }
    out.push_str("\\end{eqnarray*}\n");
    out
}
