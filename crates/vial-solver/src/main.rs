//! CLI entry point for the vial solver.
//!
//! Usage:
//!   vial-solver solve <request.json> [options]
//!   vial-solver solve --stdin [options]
//!   vial-solver verify <request.json>
//!
//! Options:
//!   --strict              Require every color consolidated into one vial
//!   --max-states <n>      Exploration budget in expanded states (default: 100000)
//!   --pretty              Pretty-print the JSON output
//!   --log-level <level>   Log filter when RUST_LOG is unset (default: warn)

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vial_solver::{
    handle_request, handle_verify, parse_request, SolverConfig, VerifyRequest, DEFAULT_MAX_STATES,
};

#[derive(Parser)]
#[command(name = "vial-solver")]
#[command(about = "Shortest-path solver for liquid sort puzzles")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest sequence of pours that sorts the vials
    Solve {
        /// Path to request JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the request from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Use the strict goal regardless of the request's strictMode
        #[arg(long)]
        strict: bool,

        /// Maximum number of states to expand
        #[arg(long, default_value_t = DEFAULT_MAX_STATES)]
        max_states: usize,
    },

    /// Check that a move list solves the puzzle
    Verify {
        /// Path to request JSON file with a "moves" array
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the request from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Solve {
            file,
            stdin,
            strict,
            max_states,
        } => {
            let json_content = read_input(file.as_ref(), *stdin)?;
            let mut request = parse_request(&json_content).context("failed to parse solve request")?;
            if *strict {
                request.strict_mode = true;
            }

            let config = SolverConfig {
                max_states: *max_states,
            };
            let response = handle_request(&request, &config)?;
            print_json(&response, cli.pretty)?;

            Ok(exit_code(response.success))
        }

        Commands::Verify { file, stdin } => {
            let json_content = read_input(file.as_ref(), *stdin)?;
            let request: VerifyRequest =
                serde_json::from_str(&json_content).context("failed to parse verify request")?;

            let response = handle_verify(&request)?;
            print_json(&response, cli.pretty)?;

            Ok(exit_code(response.valid))
        }
    }
}

fn read_input(file: Option<&PathBuf>, stdin: bool) -> anyhow::Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(path).with_context(|| format!("failed to read file {}", path.display()))
    } else {
        bail!("must provide either a file path or --stdin")
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
