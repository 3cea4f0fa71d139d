//! CLI command implementations

mod convergence;
mod gradients;
mod info;
mod reweight;
mod validate;

use crate::cli::args::{Cli, Command};
use crate::cli::LogLevel;
use crate::error::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Gradients(args) => gradients::run_gradients(args, log_level),
        Command::Reweight(args) => reweight::run_reweight(args, log_level),
        Command::Convergence(args) => convergence::run_convergence(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}
