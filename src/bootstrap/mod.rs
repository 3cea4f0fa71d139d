//! Bootstrap convergence testing of reweighted contributions
//!
//! Repeatedly resamples a subset of paths without replacement, recomputes
//! the reweighted aggregate contribution on the subset, and records the
//! trial outcomes per feature group. Across a sweep of subsample sizes the
//! spread of the trials is the convergence signal: it shrinks as the
//! subsample approaches the full path population, reaching zero spread at
//! the full size (a full-size draw without replacement is deterministic).

use crate::dataset::{Dataset, PathIndexer};
use crate::error::{Error, Result};
use crate::gradient::{gradients_for_group, integrate_paths};
use crate::model::PathwayModel;
use crate::reweight::{reweight_contribution, DensityKind};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Harness parameters
#[derive(Debug, Clone, Copy)]
pub struct BootstrapConfig {
    /// Trials per subsample size
    pub trials: usize,
    /// Perturbation fraction for the gradient estimator
    pub pert: f64,
    /// Boltzmann temperature, K
    pub temperature: f64,
    /// Density arm of the reweighting
    pub density: DensityKind,
    /// RNG seed; trials are reproducible per (seed, subsample size)
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            pert: crate::gradient::DEFAULT_PERT,
            temperature: crate::reweight::DEFAULT_TEMPERATURE,
            density: DensityKind::GaussianMixture,
            seed: 42,
        }
    }
}

/// Contribution of one feature group over one sampled path subset
///
/// Recomputes gradients restricted to the subset, integrates them, and
/// reweights against the subset's barriers. The result is scaled by the
/// subset size: the weights form a density over however many paths were
/// drawn, so without the scaling, magnitudes at different subsample sizes
/// are not comparable.
pub fn subset_contribution<M: PathwayModel>(
    model: &M,
    dataset: &Dataset,
    indexer: &PathIndexer,
    mask: ArrayView1<'_, f64>,
    barriers: ArrayView1<'_, f64>,
    path_ids: &[usize],
    config: &BootstrapConfig,
) -> Result<f64> {
    let grads = gradients_for_group(model, dataset, indexer, mask, path_ids, config.pert)?;
    let integrated = integrate_paths(grads.view());

    let mut subset_barriers = Array1::zeros(path_ids.len());
    for (i, &pid) in path_ids.iter().enumerate() {
        if pid >= barriers.len() {
            return Err(Error::ShapeMismatch(format!(
                "path id {pid} out of range for {} barriers",
                barriers.len()
            )));
        }
        subset_barriers[i] = barriers[pid];
    }

    let contribution = reweight_contribution(
        subset_barriers.view(),
        integrated.view(),
        config.density,
        config.temperature,
    )?;
    Ok(contribution * path_ids.len() as f64)
}

/// Bootstrap trials for every feature group at one subsample size
///
/// Draws `npath` path indices uniformly without replacement from
/// `population` paths, `config.trials` times per group. Returns a
/// `(groups, trials)` matrix in the order of `masks`.
pub fn bootstrap_contributions<M: PathwayModel>(
    model: &M,
    dataset: &Dataset,
    indexer: &PathIndexer,
    masks: &[Array1<f64>],
    barriers: ArrayView1<'_, f64>,
    population: usize,
    npath: usize,
    config: &BootstrapConfig,
) -> Result<Array2<f64>> {
    if npath == 0 {
        return Err(Error::EmptySelection(
            "bootstrap subsample size is zero".to_string(),
        ));
    }
    if npath > population {
        return Err(Error::ShapeMismatch(format!(
            "cannot draw {npath} paths without replacement from {population}"
        )));
    }

    // One deterministic stream per (seed, subsample size): sweeps over
    // sizes do not share draws, trials within a size do not repeat.
    let mut rng = StdRng::seed_from_u64(config.seed ^ (npath as u64).wrapping_mul(0x9e37_79b9));

    let mut outcomes = Array2::zeros((masks.len(), config.trials));
    for (g, mask) in masks.iter().enumerate() {
        for t in 0..config.trials {
            let path_ids: Vec<usize> = rand::seq::index::sample(&mut rng, population, npath)
                .into_iter()
                .collect();
            let value = subset_contribution(
                model,
                dataset,
                indexer,
                mask.view(),
                barriers,
                &path_ids,
                config,
            )?;
            outcomes[[g, t]] = value;
        }
    }
    Ok(outcomes)
}
