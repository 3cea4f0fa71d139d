//! `validate` command: check a configuration without computing

use crate::cli::args::ConfigArgs;
use crate::cli::logging::{log, LogLevel};
use crate::config::RunConfig;
use crate::error::Result;
use crate::features::FeatureGroupRegistry;

/// Validate the YAML configuration and the feature-group tables
pub fn run_validate(args: ConfigArgs, level: LogLevel) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    FeatureGroupRegistry::default().validate()?;

    let units: usize = config.systems.len() * config.mechanisms.len();
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Configuration OK: {} systems x {} mechanisms = {units} dataset units",
            config.systems.len(),
            config.mechanisms.len()
        ),
    );
    Ok(())
}
