// ===== fmmforge/src/reports/mod.rs =====
pub mod latex;

use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fmmforge::reduction::{AlgorithmReport, ReductionReport, Strategy};
use fmmforge::{FmmAlgorithm, FmmMatrix, MatrixRole};
use std::time::Duration;
use strum::IntoEnumIterator;

pub fn print_algorithm_header(alg: &FmmAlgorithm) {
    let ring = if alg.p == 0 {
        "Z".to_string()
    } else {
        format!("Z_{}", alg.p)
    };
    let [a, b, c] = alg.additions();
    println!(
        "\n{}: (k, l, m, q) = ({}, {}, {}, {}) over {}, {} + {} + {} = {} additions",
        alg.name,
        alg.k,
        alg.l,
        alg.m,
        alg.q,
        ring,
        a,
        b,
        c,
        a + b + c
    );
}

/// Grid of the logical matrix. Substitution rows and columns are labelled `t<i>`.
pub fn matrix_table(matrix: &FmmMatrix) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled);

    let label = |i: usize, core: usize| {
        if i < core {
            i.to_string()
        } else {
            format!("t{}", i - core)
        }
    };

    let mut header = vec![Cell::new("")];
    header.extend((0..matrix.logical_cols()).map(|j| {
        let cell = Cell::new(label(j, matrix.cols())).add_attribute(Attribute::Bold);
        if j >= matrix.cols() {
            cell.fg(Color::Cyan)
        } else {
            cell
        }
    }));
    table.set_header(header);

    for i in 0..matrix.logical_rows() {
        let mut row = vec![Cell::new(label(i, matrix.rows())).add_attribute(Attribute::Bold)];
        row.extend(matrix.row(i).iter().map(|&e| {
            let text = if e == 0 { String::new() } else { e.to_string() };
            Cell::new(text).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }
    table
}

pub fn print_algorithm_matrices(alg: &FmmAlgorithm) {
    for role in MatrixRole::iter() {
        let m = alg.matrix(role);
        println!(
            "\n{} = ({} additions, {} substitutions)",
            role,
            m.num_additions(),
            m.t()
        );
        println!("{}", matrix_table(m));
    }
}

fn weights_text(report: &ReductionReport) -> String {
    match (report.strategy, report.weights) {
        (Strategy::PotentialSweep(_), Some((k1, k2))) | (Strategy::Potential { .. }, Some((k1, k2))) => {
            format!("({}, {}) alpha = {:.6}", k1, k2, k2 as f64 / k1 as f64)
        }
        _ => "-".to_string(),
    }
}

fn percent(saved: usize, before: usize) -> String {
    if before == 0 {
        "-".to_string()
    } else {
        format!("{:5.2}%", 100.0 * saved as f64 / before as f64)
    }
}

pub fn print_summary(report: &AlgorithmReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Matrix").add_attribute(Attribute::Bold),
        Cell::new("Naive"),
        Cell::new("Reduced").fg(Color::Cyan),
        Cell::new("Saved").fg(Color::Green),
        Cell::new("Savings"),
        Cell::new("Subst"),
        Cell::new("Method"),
        Cell::new("(k1, k2)"),
        Cell::new("Nodes"),
    ]);
    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in &report.roles {
        let d = &r.report;
        let nodes = d
            .search
            .map_or_else(|| "-".to_string(), |s| format!("{} ({} pruned)", s.nodes, s.pruned));
        table.add_row(vec![
            Cell::new(r.role).add_attribute(Attribute::Bold),
            Cell::new(d.additions_before),
            Cell::new(d.additions_after).fg(Color::Cyan),
            Cell::new(d.saved()).fg(Color::Green),
            Cell::new(percent(d.saved(), d.additions_before)),
            Cell::new(d.substitutions),
            Cell::new(d.strategy.label()),
            Cell::new(weights_text(d)),
            Cell::new(nodes),
        ]);
    }

    let before = report.additions_before();
    let after = report.additions_after();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(before),
        Cell::new(after).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(before - after).fg(Color::Green),
        Cell::new(percent(before - after, before)),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]);

    println!("\n{}: {} -> {} additions", report.name, before, after);
    println!("{}", table);
}

pub fn print_runtime(elapsed: Duration) {
    let seconds = elapsed.as_secs_f64();
    if seconds < 1.0 {
        println!("Reduction runtime: {:.6} sec", seconds);
    } else {
        println!("Reduction runtime: {:.2} sec", seconds);
    }
}
