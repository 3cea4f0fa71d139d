//! `reweight` command: aggregate stored integrated gradients

use crate::cli::args::ConfigArgs;
use crate::cli::logging::{log, LogLevel};
use crate::config::RunConfig;
use crate::dataset::{load_predictions, predicted_barriers};
use crate::error::{Error, Result};
use crate::features::FeatureGroupRegistry;
use crate::reweight::{reweight_contribution, DensityKind};
use crate::store::{ArtifactKey, ArtifactStore, Presence};
use std::fs;

/// Reweight each feature group's integrated gradients into one scalar
/// contribution per (system, mechanism), written to `contribution.log`
pub fn run_reweight(args: ConfigArgs, level: LogLevel) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let registry = FeatureGroupRegistry::default();
    registry.validate()?;
    let store = ArtifactStore::new(&config.output_dir)?;

    let mut report = String::new();
    for system in &config.systems {
        for &mechanism in &config.mechanisms {
            let y_pred = load_predictions(&config.data_dir, system, mechanism)?;
            let barriers = predicted_barriers(y_pred.view(), config.nrep)?;

            report.push_str(&format!("\n{system}: {mechanism}\n\n"));
            for group in registry.group_names(mechanism) {
                let key = ArtifactKey::integrated(system, mechanism, &group);
                if store.status(&key) == Presence::Absent {
                    return Err(Error::EmptySelection(format!(
                        "integrated gradients for {system} {mechanism} {group} \
                         not yet computed; run `atribuir gradients` first"
                    )));
                }
                let integrated = store.load_vector(&key)?;

                let contribution = reweight_contribution(
                    barriers.view(),
                    integrated.view(),
                    DensityKind::Gaussian,
                    config.temperature,
                )?;

                report.push_str(&format!("\t{group}\t\t{contribution}\n"));
                log(
                    level,
                    LogLevel::Verbose,
                    &format!("{system} {mechanism} {group}: {contribution}"),
                );
            }
        }
    }

    let log_path = config.output_dir.join("contribution.log");
    fs::write(&log_path, &report)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Wrote contributions to {}", log_path.display()),
    );
    Ok(())
}
