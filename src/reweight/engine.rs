//! Contribution reweighting over path subsets

use super::density::{boltzmann_density, gaussian_density};
use super::gmm::GaussianMixture;
use crate::error::{Error, Result};
use ndarray::ArrayView1;

/// Which density estimator weights the barrier distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityKind {
    /// Single Gaussian from sample mean/stdev
    Gaussian,
    /// 2-component Gaussian mixture (convergence-test variant)
    GaussianMixture,
}

/// Reweighted aggregate contribution of one feature group
///
/// Elementwise product of integrated gradient, normalized density weight
/// and normalized Boltzmann weight, summed over the path subset:
///
/// ```text
/// contribution = sum_paths integrated * w_density * w_boltzmann
/// ```
///
/// A path needs both a typical barrier (density arm) and a low barrier
/// (Boltzmann arm) to contribute strongly; outliers and kinetically
/// irrelevant paths are suppressed together.
pub fn reweight_contribution(
    barriers: ArrayView1<'_, f64>,
    integrated: ArrayView1<'_, f64>,
    kind: DensityKind,
    temperature: f64,
) -> Result<f64> {
    if barriers.len() != integrated.len() {
        return Err(Error::ShapeMismatch(format!(
            "{} barriers for {} integrated gradients",
            barriers.len(),
            integrated.len()
        )));
    }

    let density = match kind {
        DensityKind::Gaussian => gaussian_density(barriers, true)?,
        DensityKind::GaussianMixture => {
            GaussianMixture::fit(barriers, 2)?.density(barriers, true)?
        }
    };
    let boltzmann = boltzmann_density(barriers, temperature, true)?;

    Ok(integrated
        .iter()
        .zip(density.iter())
        .zip(boltzmann.iter())
        .map(|((&ig, &d), &b)| ig * d * b)
        .sum())
}
