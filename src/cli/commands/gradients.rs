//! `gradients` command: compute and store per-group gradient artifacts

use crate::cli::args::ConfigArgs;
use crate::cli::logging::{log, LogLevel};
use crate::config::RunConfig;
use crate::dataset::{load_dataset, PathIndexer};
use crate::error::Result;
use crate::features::FeatureGroupRegistry;
use crate::gradient::{gradients_for_group, integrate_paths};
use crate::model::load_model;
use crate::runner::{Task, TaskPool};
use crate::store::{ArtifactKey, ArtifactStore};

/// Compute gradient sequences and integrated gradients for every
/// (system, mechanism, feature-group) unit in the configuration
pub fn run_gradients(args: ConfigArgs, level: LogLevel) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let registry = FeatureGroupRegistry::default();
    registry.validate()?;
    let store = ArtifactStore::new(&config.output_dir)?;

    let mut tasks = Vec::new();
    for system in &config.systems {
        for &mechanism in &config.mechanisms {
            for group in registry.group_names(mechanism) {
                let label = format!("{system} {mechanism} {group}");
                let system = system.clone();
                let registry = registry.clone();
                let store = store.clone();
                let data_dir = config.data_dir.clone();
                let model_dir = config.model_dir.clone();
                let (nrep, pert) = (config.nrep, config.pert);
                let task_label = label.clone();

                tasks.push(Task::new(label, move || {
                    // Each unit loads its own data and model copy; units
                    // share nothing mutable.
                    let dataset = load_dataset(&data_dir, &system, mechanism)?;
                    let model = load_model(&model_dir, &system, mechanism)?;
                    let indexer = PathIndexer::new(nrep)?;
                    let n_paths = indexer.n_paths(dataset.rows())?;
                    let mask = registry.mask(mechanism, &group, dataset.feature_width())?;

                    let path_ids: Vec<usize> = (0..n_paths).collect();
                    let grads = gradients_for_group(
                        &model,
                        &dataset,
                        &indexer,
                        mask.view(),
                        &path_ids,
                        pert,
                    )?;
                    store.save_matrix(&ArtifactKey::gradients(&system, mechanism, &group), &grads)?;

                    let integrated = integrate_paths(grads.view());
                    store.save_vector(
                        &ArtifactKey::integrated(&system, mechanism, &group),
                        &integrated,
                    )?;

                    log(
                        level,
                        LogLevel::Verbose,
                        &format!("Done: {task_label} ({n_paths} paths)"),
                    );
                    Ok(())
                }));
            }
        }
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Computing gradients for {} units on {} workers",
            tasks.len(),
            config.workers
        ),
    );

    let reports = TaskPool::new(config.workers).run(tasks);
    let mut first_failure = None;
    for report in reports {
        if let Err(e) = report.outcome {
            log(
                level,
                LogLevel::Normal,
                &format!("Failed: {} ({e})", report.label),
            );
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => {
            log(level, LogLevel::Normal, "All gradient units completed");
            Ok(())
        }
    }
}
