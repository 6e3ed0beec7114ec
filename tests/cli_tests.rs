mod common;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        common::write_file(self.dir.path(), name, content)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(args: &[&str], file: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmmforge"))
        .args(args)
        .arg(file)
        .output()
        .expect("Failed to execute fmmforge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_verify_strassen() {
    let ctx = TestContext::new();
    let file = ctx.write("Strassen-222-7-18.txt", &common::strassen_grey());

    let output = run(&["verify"], &file);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.contains("Strassen: (k, l, m, q) = (2, 2, 2, 7) over Z, 5 + 5 + 8 = 18 additions"));
    assert!(out.contains("Algorithm correctness verification: ok"));
}

#[test]
fn test_verify_rejects_corrupted_file() {
    let ctx = TestContext::new();
    let corrupted = common::strassen_exp().replace("(a22)*(b21-b11)", "(a22)*(b21+b11)");
    let file = ctx.write("Strassen-222-7-18.exp", &corrupted);

    let output = run(&["verify"], &file);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("NOT OK"));
}

#[test]
fn test_reduce_strassen_vanilla() {
    let ctx = TestContext::new();
    let file = ctx.write("Strassen-222-7-x.m", &common::strassen_m());

    let output = run(&["reduce", "-r", "vanilla", "--show-matrices"], &file);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.contains("Algorithm correctness verification before reduction: ok"));
    assert!(out.contains("Algorithm correctness verification after reduction: ok"));
    assert!(out.contains("Strassen: 18 -> 18 additions"));
    let runtime = Regex::new(r"Reduction runtime: \d+\.\d+ sec").unwrap();
    assert!(runtime.is_match(&out));
}

#[test]
fn test_reduce_winograd_form_with_latex() {
    let ctx = TestContext::new();
    let mut grey = String::new();
    for rows in [&common::WINOGRAD_A, &common::WINOGRAD_B, &common::WINOGRAD_C] {
        for row in rows.iter() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            grey.push_str(&line.join(" "));
            grey.push('\n');
        }
    }
    let file = ctx.write("Winograd-222-7-24.txt", &grey);

    let output = run(&["reduce", "--method", "gv", "--latex"], &file);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.contains("Winograd: 24 -> 15 additions"));
    assert!(out.contains("\\begin{eqnarray*}"));
    assert!(out.contains("t_{0} &=& "));
}

#[test]
fn test_reduce_writes_json_report() {
    let ctx = TestContext::new();
    let file = ctx.write("Strassen-222-7-18.exp", &common::strassen_exp());
    let report = ctx.path("report.json");

    let output = run(
        &["reduce", "-q", "--k1", "5", "--k2", "1", "--json", report.to_str().unwrap()],
        &file,
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["name"], "Strassen");
    assert_eq!(json["q"], 7);
    assert_eq!(json["correct_before"], true);
    assert_eq!(json["correct_after"], true);
    let roles = json["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 3);
    assert_eq!(roles[0]["role"], "A");
    assert_eq!(roles[2]["additions_before"], 8);
}

#[test]
fn test_reduce_with_config_file() {
    let ctx = TestContext::new();
    let file = ctx.write("Strassen-222-7-18.txt", &common::strassen_grey());
    let config = ctx.write("settings.json", r#"{ "method": "brute-force" }"#);

    let output = run(&["reduce", "--config", config.to_str().unwrap()], &file);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("brute-force"));
}

#[test]
fn test_bad_file_name_fails() {
    let ctx = TestContext::new();
    let file = ctx.write("strassen.txt", &common::strassen_grey());
    let output = run(&["reduce"], &file);
    assert!(!output.status.success());
}
