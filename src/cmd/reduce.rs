use crate::reports::{self, latex};
use clap::{ArgMatches, Args};
use fmmforge::config::ReductionConfig;
use fmmforge::error::FmmResult;
use fmmforge::reduction::{self, AlgorithmReport};
use fmmforge::{loader, verifier, FmmAlgorithm};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct ReduceArgs {
    /// Algorithm file (.txt, .m or .exp)
    pub file: PathBuf,

    #[command(flatten)]
    pub config: ReductionConfig,

    /// JSON file with reduction settings; flags typed here override it
    #[arg(long = "config", value_name = "JSON")]
    pub config_file: Option<PathBuf>,

    /// Print the naive and reduced algorithm as LaTeX
    #[arg(long, default_value_t = false)]
    pub latex: bool,

    /// Print A, B and C before and after reduction
    #[arg(long, default_value_t = false)]
    pub show_matrices: bool,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    k: usize,
    l: usize,
    m: usize,
    q: usize,
    p: u32,
    correct_before: bool,
    correct_after: bool,
    #[serde(flatten)]
    reduction: &'a AlgorithmReport,
}

fn resolve_config(args: &ReduceArgs, matches: Option<&ArgMatches>) -> FmmResult<ReductionConfig> {
    let Some(path) = &args.config_file else {
        return Ok(args.config.clone());
    };
    info!("⚖️  Loading settings from: {}", path.display());
    let mut config = ReductionConfig::load_from_file(path)?;
    if let Some(m) = matches {
        config.merge_from_cli(&args.config, m);
    }
    Ok(config)
}

fn check(alg: &FmmAlgorithm, stage: &str) -> bool {
    match verifier::verify(alg) {
        Ok(()) => {
            println!("Algorithm correctness verification {}: ok", stage);
            true
        }
        Err(d) => {
            println!("Algorithm correctness verification {}: NOT OK ({})", stage, d);
            false
        }
    }
}

pub fn run(args: ReduceArgs, matches: Option<&ArgMatches>) -> FmmResult<ExitCode> {
    // 1. Settings
    let config = resolve_config(&args, matches)?;

    // 2. Load
    info!("📂 Using file {}", args.file.display());
    let mut alg = loader::load_algorithm(&args.file, config.t_capacity)?;
    reports::print_algorithm_header(&alg);
    if args.show_matrices {
        println!("Naive algorithm in compact form:");
        reports::print_algorithm_matrices(&alg);
    }

    // 3. Verify naive
    let correct_before = check(&alg, "before reduction");
    if !correct_before {
        error!("❌ {} does not compute the matrix product", args.file.display());
        return Ok(ExitCode::FAILURE);
    }
    if args.latex {
        println!("\nComplete naive algorithm in LaTeX format:");
        print!("{}", latex::render_algorithm(&alg));
    }

    // 4. Reduce
    info!("🔥 Reducing with method {}", config.method);
    let report = reduction::reduce_algorithm(&mut alg, |role| config.strategy_for(role))?;

    if args.show_matrices {
        println!("\nReduced algorithm in compact form:");
        reports::print_algorithm_matrices(&alg);
    }

    // 5. Verify reduced
    let correct_after = check(&alg, "after reduction");
    if args.latex {
        println!("\nComplete reduced algorithm in LaTeX format:");
        print!("{}", latex::render_algorithm(&alg));
    }

    // 6. Report
    reports::print_summary(&report);
    reports::print_runtime(report.elapsed());

    if let Some(path) = &args.json {
        let json = JsonReport {
            file: args.file.display().to_string(),
            k: alg.k,
            l: alg.l,
            m: alg.m,
            q: alg.q,
            p: alg.p,
            correct_before,
            correct_after,
            reduction: &report,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &json)?;
        info!("📝 JSON report written to {}", path.display());
    }

    if !correct_after {
        error!("❌ Reduced algorithm failed verification");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
