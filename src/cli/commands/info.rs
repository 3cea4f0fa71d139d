//! `info` command: configuration and dataset summary

use crate::cli::args::ConfigArgs;
use crate::cli::logging::{log, LogLevel};
use crate::config::RunConfig;
use crate::dataset::{load_dataset, load_feature_labels, PathIndexer};
use crate::error::Result;
use crate::features::FeatureGroupRegistry;
use crate::store::{ArtifactKey, ArtifactStore, Presence};

/// Summarize the run configuration, dataset shapes and artifact status
pub fn run_info(args: ConfigArgs, level: LogLevel) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let registry = FeatureGroupRegistry::default();
    registry.validate()?;
    let store = ArtifactStore::new(&config.output_dir)?;

    log(level, LogLevel::Normal, "Run configuration:");
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  nrep={} pert={} temperature={}K trials={} seed={}",
            config.nrep, config.pert, config.temperature, config.trials, config.seed
        ),
    );
    if !config.subsample_sizes.is_empty() {
        log(
            level,
            LogLevel::Normal,
            &format!("  subsample sweep: {:?}", config.subsample_sizes),
        );
    }

    for system in &config.systems {
        for &mechanism in &config.mechanisms {
            let groups = registry.group_names(mechanism);
            match load_dataset(&config.data_dir, system, mechanism) {
                Ok(dataset) => {
                    let indexer = PathIndexer::new(config.nrep)?;
                    let paths = indexer
                        .n_paths(dataset.rows())
                        .map(|n| n.to_string())
                        .unwrap_or_else(|_| "misaligned".to_string());
                    let computed = groups
                        .iter()
                        .filter(|g| {
                            store.status(&ArtifactKey::integrated(system, mechanism, g))
                                == Presence::Present
                        })
                        .count();
                    log(
                        level,
                        LogLevel::Normal,
                        &format!(
                            "{system} {mechanism}: {} rows x {} features, {paths} paths, \
                             {computed}/{} groups integrated",
                            dataset.rows(),
                            dataset.feature_width(),
                            groups.len()
                        ),
                    );

                    // With a label file present, show which coordinates each
                    // group selects.
                    if let Ok(labels) = load_feature_labels(&config.data_dir, system, mechanism) {
                        for group in &groups {
                            let selected =
                                registry.masked_labels(mechanism, group, &labels)?;
                            log(
                                level,
                                LogLevel::Verbose,
                                &format!("  {group}: {}", selected.join(", ")),
                            );
                        }
                    }
                }
                Err(e) => {
                    log(
                        level,
                        LogLevel::Normal,
                        &format!("{system} {mechanism}: dataset not loadable ({e})"),
                    );
                }
            }
        }
    }
    Ok(())
}
