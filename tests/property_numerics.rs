//! Property tests for the numerical core
//!
//! Ensures the statistical contracts hold over arbitrary inputs:
//! - normalized densities sum to 1
//! - Boltzmann weights are monotone in the barrier
//! - path integration matches its defining decomposition
//! - finite-difference gradients of a linear model are exact

use atribuir::gradient::{gradient_along_path, integrate_path, DEFAULT_PERT};
use atribuir::model::PathwayModel;
use atribuir::reweight::{
    boltzmann_density, gaussian_density, GaussianMixture, DEFAULT_TEMPERATURE,
};
use atribuir::Result;
use ndarray::{arr1, Array1, Array2, ArrayView2};
use proptest::collection::vec;
use proptest::prelude::*;

/// f(x, poh) = sum_j coeff[j] * x[j], blind to the one-hot input
struct LinearModel {
    coeff: Array1<f64>,
}

impl PathwayModel for LinearModel {
    fn predict(&self, x: ArrayView2<'_, f64>, _xpoh: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        Ok(x.dot(&self.coeff))
    }
}

fn barrier_set(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    vec(-50.0..50.0f64, len)
}

proptest! {
    #[test]
    fn prop_gaussian_normalized_sums_to_one(barriers in barrier_set(1..40)) {
        let arr = Array1::from_vec(barriers);
        let prob = gaussian_density(arr.view(), true).unwrap();

        prop_assert!((prob.sum() - 1.0).abs() < 1e-9, "sum = {}", prob.sum());
        prop_assert!(prob.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn prop_boltzmann_normalized_sums_to_one(barriers in barrier_set(1..40)) {
        let arr = Array1::from_vec(barriers);
        let prob = boltzmann_density(arr.view(), DEFAULT_TEMPERATURE, true).unwrap();

        prop_assert!((prob.sum() - 1.0).abs() < 1e-9, "sum = {}", prob.sum());
        prop_assert!(prob.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn prop_gmm_normalized_sums_to_one(barriers in barrier_set(2..40)) {
        let arr = Array1::from_vec(barriers);
        let gmm = GaussianMixture::fit(arr.view(), 2).unwrap();
        let prob = gmm.density(arr.view(), true).unwrap();

        prop_assert!((prob.sum() - 1.0).abs() < 1e-9, "sum = {}", prob.sum());
    }

    #[test]
    fn prop_boltzmann_lower_barrier_heavier(
        b1 in -50.0..50.0f64,
        gap in 0.01..20.0f64,
    ) {
        let arr = arr1(&[b1, b1 + gap]);
        let prob = boltzmann_density(arr.view(), DEFAULT_TEMPERATURE, false).unwrap();
        prop_assert!(prob[0] > prob[1], "w({b1}) = {} <= w({}) = {}", prob[0], b1 + gap, prob[1]);
    }

    #[test]
    fn prop_integration_matches_decomposition(grad in vec(-10.0..10.0f64, 0..30)) {
        let arr = Array1::from_vec(grad.clone());

        // Reference: explicit cumulative sum.
        let mut cumsum = Vec::with_capacity(grad.len());
        let mut acc = 0.0;
        for g in &grad {
            acc += g;
            cumsum.push(acc);
        }
        let expected: f64 =
            cumsum.iter().map(|c: &f64| c.abs()).sum::<f64>() + grad.iter().sum::<f64>().abs();

        let got = integrate_path(arr.view());
        prop_assert!((got - expected).abs() < 1e-9, "{got} != {expected}");
    }

    #[test]
    fn prop_linear_gradient_is_analytic(
        c0 in -5.0..5.0f64,
        c1 in -5.0..5.0f64,
        steps in vec(0.1..2.0f64, 9..20),
    ) {
        // Path where feature 0 walks by the sampled steps and feature 1
        // walks uniformly; mask selects feature 0 only. For a linear model
        // the centered difference is exact:
        //   grad[i] = c0 * (x0[i+1] - x0[i-1]) / 2
        let nrep = steps.len() + 1;
        let mut x0 = vec![0.0];
        for s in &steps {
            x0.push(x0.last().unwrap() + s);
        }
        let x = Array2::from_shape_fn((nrep, 2), |(i, j)| {
            if j == 0 { x0[i] } else { i as f64 }
        });
        let xpoh = Array2::ones((nrep, 1));
        let mask = arr1(&[1.0, 0.0]);
        let model = LinearModel { coeff: arr1(&[c0, c1]) };

        let grad =
            gradient_along_path(&model, x.view(), xpoh.view(), mask.view(), DEFAULT_PERT).unwrap();

        prop_assert_eq!(grad.len(), nrep - 2);
        for i in 0..grad.len() {
            let expected = c0 * (x0[i + 2] - x0[i]) / 2.0;
            prop_assert!(
                (grad[i] - expected).abs() < 1e-9,
                "replica {}: {} != {}", i + 1, grad[i], expected
            );
        }
    }
}
