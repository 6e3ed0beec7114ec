// ===== fmmforge/src/main.rs =====
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every greedy step and search improvement
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(global = true, short, long, default_value_t = false, conflicts_with = "debug")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce the additions of an algorithm file
    Reduce(cmd::reduce::ReduceArgs),
    /// Check that an algorithm file computes the matrix product
    Verify(cmd::verify::VerifyArgs),
}

fn main() -> ExitCode {
    // 1. Parse Raw Matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();

    // 2. Construct CLI struct (populated with defaults)
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // 3. Logging
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // 4. Execute
    let result = match cli.command {
        Commands::Reduce(args) => cmd::reduce::run(args, matches.subcommand_matches("reduce")),
        Commands::Verify(args) => cmd::verify::run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
