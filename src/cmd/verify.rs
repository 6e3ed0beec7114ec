use crate::reports;
use clap::Args;
use fmmforge::error::FmmResult;
use fmmforge::{loader, verifier};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Algorithm file (.txt, .m or .exp)
    pub file: PathBuf,

    /// Print A, B and C
    #[arg(long, default_value_t = false)]
    pub show_matrices: bool,
}

pub fn run(args: VerifyArgs) -> FmmResult<ExitCode> {
    info!("📂 Using file {}", args.file.display());
    let alg = loader::load_algorithm(&args.file, 0)?;
    reports::print_algorithm_header(&alg);
    if args.show_matrices {
        reports::print_algorithm_matrices(&alg);
    }

    match verifier::verify(&alg) {
        Ok(()) => {
            println!("Algorithm correctness verification: ok");
            Ok(ExitCode::SUCCESS)
        }
        Err(d) => {
            println!("Algorithm correctness verification: NOT OK");
            error!("❌ {}", d);
            Ok(ExitCode::FAILURE)
        }
    }
}
