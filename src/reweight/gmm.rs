//! One-dimensional Gaussian mixture density estimation

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1};

const VARIANCE_FLOOR: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;
const LOG_LIKELIHOOD_TOL: f64 = 1e-9;

/// Gaussian mixture model fitted by expectation-maximization
///
/// Used as the density arm of the convergence-test reweighting, where a
/// bimodal barrier population makes the plain Gaussian a poor fit.
/// Initialization is a deterministic sorted split into contiguous chunks,
/// so repeated fits of the same barrier set give identical densities.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    weights: Vec<f64>,
    means: Vec<f64>,
    variances: Vec<f64>,
}

fn normal_pdf(x: f64, mean: f64, var: f64) -> f64 {
    let norm = 1.0 / (2.0 * std::f64::consts::PI * var).sqrt();
    norm * (-0.5 * (x - mean).powi(2) / var).exp()
}

impl GaussianMixture {
    /// Fit an `n_components`-component mixture to 1-D samples
    pub fn fit(data: ArrayView1<'_, f64>, n_components: usize) -> Result<Self> {
        if n_components == 0 {
            return Err(Error::InvalidConfig(
                "mixture needs at least one component".to_string(),
            ));
        }
        if data.len() < n_components {
            return Err(Error::EmptySelection(format!(
                "cannot fit a {n_components}-component mixture to {} samples",
                data.len()
            )));
        }

        let n = data.len();
        let mut sorted: Vec<f64> = data.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        // Deterministic init: contiguous chunks of the sorted samples.
        let mut weights = Vec::with_capacity(n_components);
        let mut means = Vec::with_capacity(n_components);
        let mut variances = Vec::with_capacity(n_components);
        for k in 0..n_components {
            let lo = k * n / n_components;
            let hi = ((k + 1) * n / n_components).max(lo + 1);
            let chunk = &sorted[lo..hi];
            let m = chunk.iter().sum::<f64>() / chunk.len() as f64;
            let v = chunk.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / chunk.len() as f64;
            weights.push((hi - lo) as f64 / n as f64);
            means.push(m);
            variances.push(v.max(VARIANCE_FLOOR));
        }

        let mut model = Self {
            weights,
            means,
            variances,
        };

        let mut resp = vec![vec![0.0; n]; n_components];
        let mut prev_ll = f64::NEG_INFINITY;

        for _ in 0..MAX_ITERATIONS {
            // E-step: responsibilities and the observed log-likelihood.
            let mut ll = 0.0;
            for (i, &x) in data.iter().enumerate() {
                let mut total = 0.0;
                for k in 0..n_components {
                    let p = model.weights[k] * normal_pdf(x, model.means[k], model.variances[k]);
                    resp[k][i] = p;
                    total += p;
                }
                // A sample falling numerically outside every component gets
                // flat responsibilities rather than a 0/0 split.
                if total > 0.0 {
                    for r in resp.iter_mut() {
                        r[i] /= total;
                    }
                    ll += total.ln();
                } else {
                    for r in resp.iter_mut() {
                        r[i] = 1.0 / n_components as f64;
                    }
                }
            }

            // M-step.
            for k in 0..n_components {
                let nk: f64 = resp[k].iter().sum();
                if nk <= 0.0 {
                    continue;
                }
                let mean = resp[k]
                    .iter()
                    .zip(data.iter())
                    .map(|(&r, &x)| r * x)
                    .sum::<f64>()
                    / nk;
                let var = resp[k]
                    .iter()
                    .zip(data.iter())
                    .map(|(&r, &x)| r * (x - mean).powi(2))
                    .sum::<f64>()
                    / nk;
                model.weights[k] = nk / n as f64;
                model.means[k] = mean;
                model.variances[k] = var.max(VARIANCE_FLOOR);
            }

            if (ll - prev_ll).abs() < LOG_LIKELIHOOD_TOL {
                break;
            }
            prev_ll = ll;
        }

        Ok(model)
    }

    /// Mixture density at each point
    ///
    /// With `normalize`, divides by the sum over the evaluated points so the
    /// weights sum to 1.
    pub fn density(&self, points: ArrayView1<'_, f64>, normalize: bool) -> Result<Array1<f64>> {
        if points.is_empty() {
            return Err(Error::EmptySelection(
                "mixture density over an empty barrier set".to_string(),
            ));
        }

        let mut prob = points.mapv(|x| {
            self.weights
                .iter()
                .zip(self.means.iter())
                .zip(self.variances.iter())
                .map(|((&w, &m), &v)| w * normal_pdf(x, m, v))
                .sum::<f64>()
        });

        if normalize {
            let sum = prob.sum();
            prob /= sum;
        }
        Ok(prob)
    }

    /// Component means, in initialization order
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Component mixing weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    fn bimodal() -> Array1<f64> {
        arr1(&[
            1.0, 1.1, 0.9, 1.05, 0.95, 1.02, 9.0, 9.1, 8.9, 9.05, 8.95, 9.02,
        ])
    }

    #[test]
    fn test_two_component_fit_finds_modes() {
        let data = bimodal();
        let gmm = GaussianMixture::fit(data.view(), 2).unwrap();

        let mut means = gmm.means().to_vec();
        means.sort_by(|a, b| a.total_cmp(b));
        assert_abs_diff_eq!(means[0], 1.003, epsilon = 0.1);
        assert_abs_diff_eq!(means[1], 9.003, epsilon = 0.1);

        let wsum: f64 = gmm.weights().iter().sum();
        assert_abs_diff_eq!(wsum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_density_normalized_sums_to_one() {
        let data = bimodal();
        let gmm = GaussianMixture::fit(data.view(), 2).unwrap();
        let prob = gmm.density(data.view(), true).unwrap();
        assert_abs_diff_eq!(prob.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_density_peaks_at_modes() {
        let data = bimodal();
        let gmm = GaussianMixture::fit(data.view(), 2).unwrap();
        let points = arr1(&[1.0, 5.0, 9.0]);
        let prob = gmm.density(points.view(), false).unwrap();

        assert!(prob[0] > prob[1]);
        assert!(prob[2] > prob[1]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = bimodal();
        let a = GaussianMixture::fit(data.view(), 2).unwrap();
        let b = GaussianMixture::fit(data.view(), 2).unwrap();
        for (ma, mb) in a.means().iter().zip(b.means().iter()) {
            assert_abs_diff_eq!(ma, mb, epsilon = 0.0);
        }
    }

    #[test]
    fn test_identical_samples_uniform_density() {
        let data = arr1(&[4.0, 4.0, 4.0, 4.0]);
        let gmm = GaussianMixture::fit(data.view(), 2).unwrap();
        let prob = gmm.density(data.view(), true).unwrap();
        for &p in prob.iter() {
            assert_abs_diff_eq!(p, 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let data = arr1(&[1.0]);
        assert!(GaussianMixture::fit(data.view(), 2).is_err());
        assert!(GaussianMixture::fit(data.view(), 0).is_err());
    }
}
