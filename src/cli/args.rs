//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atribuir: reaction-path feature-contribution attribution
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "atribuir")]
#[command(version)]
#[command(
    about = "Attribute predicted energy barriers to feature groups along reaction paths"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compute and store gradient sequences and integrated gradients
    Gradients(ConfigArgs),

    /// Reweight stored integrated gradients into per-group contributions
    Reweight(ConfigArgs),

    /// Bootstrap convergence test over a sweep of subsample sizes
    Convergence(ConfigArgs),

    /// Display configuration and dataset information
    Info(ConfigArgs),

    /// Validate a configuration file without computing anything
    Validate(ConfigArgs),
}

/// Arguments shared by all commands: the run configuration file
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_gradients_command() {
        let cli = Cli::try_parse_from(["atribuir", "gradients", "run.yaml"]).unwrap();
        match cli.command {
            Command::Gradients(args) => {
                assert_eq!(args.config, PathBuf::from("run.yaml"));
            }
            _ => panic!("Expected Gradients command"),
        }
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["atribuir", "reweight", "run.yaml", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Reweight(_)));

        let cli = Cli::try_parse_from(["atribuir", "convergence", "run.yaml", "-q"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_missing_config_rejected() {
        assert!(Cli::try_parse_from(["atribuir", "gradients"]).is_err());
        assert!(Cli::try_parse_from(["atribuir"]).is_err());
    }
}
