//! Atribuir CLI
//!
//! Command-line entry point for the attribution pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Compute and cache gradient artifacts
//! atribuir gradients run.yaml
//!
//! # Aggregate contributions into contribution.log
//! atribuir reweight run.yaml
//!
//! # Bootstrap convergence sweep
//! atribuir convergence run.yaml
//!
//! # Inspect config and dataset status
//! atribuir info run.yaml
//!
//! # Validate config
//! atribuir validate run.yaml
//! ```

use atribuir::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
