//! Gaussian and Boltzmann probability densities over barrier sets

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1};

/// Boltzmann constant, kcal/mol/K (equals R, the gas constant)
pub const BOLTZMANN_KB: f64 = 0.001987204258;

/// Default simulation temperature, K
pub const DEFAULT_TEMPERATURE: f64 = 310.0;

fn require_nonempty(arr: ArrayView1<'_, f64>, what: &str) -> Result<()> {
    if arr.is_empty() {
        return Err(Error::EmptySelection(format!("{what} over an empty barrier set")));
    }
    Ok(())
}

/// Gaussian density of each barrier under the sample mean and stdev
///
/// Population (uncorrected) standard deviation; in an under-sampled set the
/// median must not be mixed into the location estimate, it would bias the
/// mean towards the pseudo-median. A zero-variance set has no defined
/// Gaussian density and falls back to uniform weights.
///
/// With `normalize`, the densities are divided by their own sum so the
/// weights sum to 1 over the set.
pub fn gaussian_density(barriers: ArrayView1<'_, f64>, normalize: bool) -> Result<Array1<f64>> {
    require_nonempty(barriers, "Gaussian density")?;

    let n = barriers.len() as f64;
    let mean = barriers.sum() / n;
    let var = barriers.iter().map(|&b| (b - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();

    if std == 0.0 {
        // All barriers identical: degenerate distribution, uniform fallback.
        let uniform = if normalize { 1.0 / n } else { 1.0 };
        return Ok(Array1::from_elem(barriers.len(), uniform));
    }

    let norm = 1.0 / (std * (2.0 * std::f64::consts::PI).sqrt());
    let mut prob = barriers.mapv(|b| norm * (-0.5 * ((b - mean) / std).powi(2)).exp());

    if normalize {
        let sum = prob.sum();
        prob /= sum;
    }
    Ok(prob)
}

/// Boltzmann density of each barrier at temperature `temp`
///
/// ```text
/// density(b) = exp((min(B) - b) / (Kb * T))
/// ```
///
/// The minimum is subtracted before exponentiating: raw barriers give
/// vanishingly small factors that underflow. This is a stability shift,
/// not a normalization, and always precedes the optional normalization.
pub fn boltzmann_density(
    barriers: ArrayView1<'_, f64>,
    temp: f64,
    normalize: bool,
) -> Result<Array1<f64>> {
    require_nonempty(barriers, "Boltzmann density")?;
    if temp <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "temperature must be positive, got {temp}"
        )));
    }

    let b_min = barriers.iter().copied().fold(f64::INFINITY, f64::min);
    let mut prob = barriers.mapv(|b| ((b_min - b) / (BOLTZMANN_KB * temp)).exp());

    if normalize {
        let sum = prob.sum();
        prob /= sum;
    }
    Ok(prob)
}
