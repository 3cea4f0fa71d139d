//! Path-wise integration of gradient sequences

use ndarray::{Array1, ArrayView1, ArrayView2};

/// Collapse one path's gradient sequence to a single scalar
///
/// ```text
/// integrated = sum(|cumsum(grad)|) + |sum(grad)|
/// ```
///
/// The cumulative-sum term rewards sustained directional drift, the final
/// raw-sum term net displacement. The combination is asymmetric on purpose
/// and is a fixed contract of the attribution scheme; do not replace it
/// with a single-term form.
pub fn integrate_path(grad: ArrayView1<'_, f64>) -> f64 {
    let mut running = 0.0;
    let mut cumsum_abs = 0.0;
    for &g in grad.iter() {
        running += g;
        cumsum_abs += running.abs();
    }
    cumsum_abs + running.abs()
}

/// Row-wise [`integrate_path`] over a `(paths, R - 2)` gradient matrix
pub fn integrate_paths(grads: ArrayView2<'_, f64>) -> Array1<f64> {
    Array1::from_iter(grads.rows().into_iter().map(integrate_path))
}
