//! `convergence` command: bootstrap sweep over subsample sizes

use crate::bootstrap::{bootstrap_contributions, BootstrapConfig};
use crate::cli::args::ConfigArgs;
use crate::cli::logging::{log, LogLevel};
use crate::config::RunConfig;
use crate::dataset::{load_dataset, load_predictions, predicted_barriers, PathIndexer};
use crate::error::{Error, Result};
use crate::features::FeatureGroupRegistry;
use crate::model::load_model;
use crate::reweight::DensityKind;
use crate::runner::{Task, TaskPool};
use crate::store::{ArtifactKey, ArtifactStore};

/// Run the bootstrap convergence test for every (system, mechanism,
/// subsample-size) unit and store one (groups × trials) matrix each
pub fn run_convergence(args: ConfigArgs, level: LogLevel) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    if config.subsample_sizes.is_empty() {
        return Err(Error::InvalidConfig(
            "convergence test needs a non-empty subsample_sizes sweep".to_string(),
        ));
    }
    let registry = FeatureGroupRegistry::default();
    registry.validate()?;
    let store = ArtifactStore::new(&config.output_dir)?;

    let bootstrap = BootstrapConfig {
        trials: config.trials,
        pert: config.pert,
        temperature: config.temperature,
        density: DensityKind::GaussianMixture,
        seed: config.seed,
    };

    let mut tasks = Vec::new();
    for system in &config.systems {
        for &mechanism in &config.mechanisms {
            for &npath in &config.subsample_sizes {
                let label = format!("{system} {mechanism} bootstrap_{npath}");
                let system = system.clone();
                let registry = registry.clone();
                let store = store.clone();
                let data_dir = config.data_dir.clone();
                let model_dir = config.model_dir.clone();
                let nrep = config.nrep;
                let task_label = label.clone();

                tasks.push(Task::new(label, move || {
                    let dataset = load_dataset(&data_dir, &system, mechanism)?;
                    let model = load_model(&model_dir, &system, mechanism)?;
                    let indexer = PathIndexer::new(nrep)?;
                    let population = indexer.n_paths(dataset.rows())?;

                    let y_pred = load_predictions(&data_dir, &system, mechanism)?;
                    let barriers = predicted_barriers(y_pred.view(), nrep)?;

                    let masks = registry
                        .group_names(mechanism)
                        .iter()
                        .map(|g| registry.mask(mechanism, g, dataset.feature_width()))
                        .collect::<Result<Vec<_>>>()?;

                    let outcomes = bootstrap_contributions(
                        &model,
                        &dataset,
                        &indexer,
                        &masks,
                        barriers.view(),
                        population,
                        npath,
                        &bootstrap,
                    )?;
                    store.save_matrix(
                        &ArtifactKey::bootstrap(&system, mechanism, npath),
                        &outcomes,
                    )?;

                    log(level, LogLevel::Verbose, &format!("Done: {task_label}"));
                    Ok(())
                }));
            }
        }
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Bootstrapping {} units on {} workers",
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
            log(level, LogLevel::Normal, "All bootstrap units completed");
            Ok(())
        }
    }
}
