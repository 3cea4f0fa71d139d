//! Predicted energy barriers per pathway

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1};

/// Barrier of each pathway from flat per-replica predicted energies
///
/// The barrier is the maximum of `y_pred[r] - y_pred[0]` over the replicas
/// of the path; a path that only descends from its first replica has
/// barrier 0 (the r = 0 term).
pub fn predicted_barriers(y_pred: ArrayView1<f64>, nrep: usize) -> Result<Array1<f64>> {
    if nrep == 0 || y_pred.is_empty() || y_pred.len() % nrep != 0 {
        return Err(Error::ShapeMismatch(format!(
            "{} predictions do not divide into paths of {nrep} replicas",
            y_pred.len()
        )));
    }

    let npath = y_pred.len() / nrep;
    let mut barriers = Array1::zeros(npath);
    for pid in 0..npath {
        let path = y_pred.slice(ndarray::s![pid * nrep..(pid + 1) * nrep]);
        let start = path[0];
        let barrier = path
            .iter()
            .map(|&e| e - start)
            .fold(f64::NEG_INFINITY, f64::max);
        barriers[pid] = barrier;
    }
    Ok(barriers)
}
