#![allow(dead_code)]

use fmmforge::FmmAlgorithm;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

// Strassen's 2x2 scheme. Rows index a11, a12, a21, a22 (resp. b, c), columns M1..M7.
pub const STRASSEN_A: [[i32; 7]; 4] = [
    [1, 0, 1, 0, 1, -1, 0],
    [0, 0, 0, 0, 1, 0, 1],
    [0, 1, 0, 0, 0, 1, 0],
    [1, 1, 0, 1, 0, 0, -1],
];
pub const STRASSEN_B: [[i32; 7]; 4] = [
    [1, 1, 0, -1, 0, 1, 0],
    [0, 0, 1, 0, 0, 1, 0],
    [0, 0, 0, 1, 0, 0, 1],
    [1, 0, -1, 0, 1, 0, 1],
];
// One line per output c11, c12, c21, c22.
pub const STRASSEN_C: [[i32; 7]; 4] = [
    [1, 0, 0, 1, -1, 0, 1],
    [0, 0, 1, 0, 1, 0, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [1, -1, 1, 0, 0, 1, 0],
];

// Winograd's variant written out without its shared subexpressions.
pub const WINOGRAD_A: [[i32; 7]; 4] = [
    [1, 0, 1, 0, 0, -1, 1],
    [0, 1, 1, 0, 0, 0, 0],
    [0, 0, -1, 0, 1, 1, -1],
    [0, 0, -1, 1, 1, 1, 0],
];
pub const WINOGRAD_B: [[i32; 7]; 4] = [
    [1, 0, 0, 1, -1, 1, 0],
    [0, 0, 0, -1, 1, -1, -1],
    [0, 1, 0, -1, 0, 0, 0],
    [0, 0, 1, 1, 0, 1, 1],
];
pub const WINOGRAD_C: [[i32; 7]; 4] = [
    [1, 1, 0, 0, 0, 0, 0],
    [1, 0, 1, 0, 1, 1, 0],
    [1, 0, 0, -1, 0, 1, 1],
    [1, 0, 0, 0, 1, 1, 1],
];

fn build(name: &str, a: &[[i32; 7]; 4], b: &[[i32; 7]; 4], c: &[[i32; 7]; 4]) -> FmmAlgorithm {
    let mut alg = FmmAlgorithm::new(name, 0, 2, 2, 2, 7, 10);
    for i in 0..4 {
        for prod in 0..7 {
            alg.a.set(i, prod, a[i][prod]);
            alg.b.set(i, prod, b[i][prod]);
            alg.c.set(prod, i, c[i][prod]);
        }
    }
    alg
}

pub fn strassen() -> FmmAlgorithm {
    build("Strassen", &STRASSEN_A, &STRASSEN_B, &STRASSEN_C)
}

/// 24 additions as written, 15 once the shared sums are factored out.
pub fn winograd() -> FmmAlgorithm {
    build("Winograd", &WINOGRAD_A, &WINOGRAD_B, &WINOGRAD_C)
}

fn line(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| format!("{:2}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn strassen_grey() -> String {
    let mut s = String::from("# Strassen 2x2x2, 7 products\n# A\n");
    for row in STRASSEN_A {
        s.push_str(&line(&row));
        s.push('\n');
    }
    s.push_str("# B\n");
    for row in STRASSEN_B {
        s.push_str(&line(&row));
        s.push('\n');
    }
    s.push_str("\n# C (transposed)\n");
    for row in STRASSEN_C {
        s.push_str(&line(&row));
        s.push('\n');
    }
    s
}

/// Per product: A entries, B entries, then C entries listed column by column.
pub fn strassen_m() -> String {
    let mut s = String::new();
    for prod in 0..7 {
        let mut v = Vec::new();
        v.extend(STRASSEN_A.iter().map(|r| r[prod]));
        v.extend(STRASSEN_B.iter().map(|r| r[prod]));
        for ci in [0, 2, 1, 3] {
            v.push(STRASSEN_C[ci][prod]);
        }
        s.push_str(&line(&v));
        s.push('\n');
    }
    s
}

/// Product expressions. Output terms carry transposed indices.
pub fn strassen_exp() -> String {
    [
        "# Strassen",
        "(a11+a22)*(b11+b22)*(c11+c22)",
        "(a21+a22)*(b11)*(c12-c22)",
        "(a11)*(b12-b22)*(c21+c22)",
        "(a22)*(b21-b11)*(c11+c12)",
        "(a11+a12)*(b22)*(-c11+c21)",
        "(a21-a11)*(b11+b12)*(c22)",
        "(a12-a22)*(b21+b22)*(c11)",
        "",
    ]
    .join("\n")
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}
