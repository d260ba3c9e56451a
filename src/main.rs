//! edgectl - Edge Tracker process-control CLI
//!
//! A command-line tool that provisions the tracker worker's runtime
//! environment and starts, stops and inspects the worker process.

use clap::{Parser, Subcommand};
use edgectl_core::{error::EdgeError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "edgectl")]
#[command(about = "Process-control CLI for the Edge Tracker worker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tracker worker
    Start {
        /// Run a single cycle synchronously and exit
        #[arg(long, conflicts_with = "background")]
        once: bool,

        /// Run detached from the terminal, logging to the configured log file
        #[arg(long)]
        background: bool,
    },
    /// Stop a worker previously started with --background
    Stop {
        /// Wait for the worker to exit, escalating to SIGKILL on timeout
        #[arg(long)]
        wait: bool,
    },
    /// Show whether a background worker is tracked and alive
    Status,
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start { once, background } => cli::start::run_start(once, background),
        Commands::Stop { wait } => cli::stop::run_stop(wait),
        Commands::Status => cli::status::run_status(),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                EdgeError::Config(_) | EdgeError::Toml(_) | EdgeError::TomlSerialize(_) => 2,
                EdgeError::EnvFile(_) => 2,
                // Runtime/process errors (exit code 1)
                EdgeError::Runtime(_) => 1,
                EdgeError::Worker(_) => 1,
                EdgeError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
