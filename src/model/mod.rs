//! Trained regressor interface
//!
//! The energy regressor is trained by an upstream stage; this crate only
//! evaluates it. [`PathwayModel`] is the evaluation seam: one predicted
//! relative energy per replica row, pure and side-effect-free, so the
//! gradient estimator can probe perturbed inputs freely.

mod dense;

pub use dense::{load_model, Activation, DenseLayer, DenseModel, ModelState};

use crate::error::Result;
use ndarray::{Array1, ArrayView2};

/// A trained model mapping (features, path one-hot) rows to scalar energies
pub trait PathwayModel {
    /// Predict one scalar per row of `x`
    ///
    /// `x` and `xpoh` must have the same row count; the one-hot indicator
    /// is auxiliary input and is never perturbed by callers.
    fn predict(&self, x: ArrayView2<'_, f64>, xpoh: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}
