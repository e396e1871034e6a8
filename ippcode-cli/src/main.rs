//! IPPcode22 interpreter: load, verify and execute.
//!
//! Exit codes:
//! - 0: Success, or the code passed to EXIT
//! - 10: Bad command-line arguments
//! - 11: Cannot open an input file
//! - 12: Cannot write output
//! - 21, 22, 23: Source text errors (header, opcode, operand)
//! - 32: Malformed instruction structure
//! - 52: Semantic error
//! - 53 to 58: Runtime errors
//! - 99: Internal error

mod commands;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit code for bad command-line arguments.
const EXIT_USAGE: i32 = 10;

#[derive(Parser)]
#[command(name = "ippcode", version)]
#[command(about = "Interpreter for the IPPcode22 instruction language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, verify and execute a program
    Run {
        /// Source file; read from stdin when omitted
        #[arg(long, required_unless_present = "input")]
        source: Option<PathBuf>,
        /// File READ takes its lines from; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Load and verify a program without running it
    Check {
        /// Source file; read from stdin when omitted
        #[arg(long)]
        source: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber.
///
/// `IPPCODE_LOG` takes an `EnvFilter` directive; the default is `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("IPPCODE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    let result = match cli.command {
        Commands::Run { source, input } => commands::run(source.as_deref(), input.as_deref()),
        Commands::Check { source } => commands::check(source.as_deref()),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
