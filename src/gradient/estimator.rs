//! Centered finite-difference gradient estimation

use crate::dataset::{Dataset, PathIndexer};
use crate::error::{Error, Result};
use crate::model::PathwayModel;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Default perturbation fraction of the local path displacement
pub const DEFAULT_PERT: f64 = 0.01;

/// Gradient of the model output w.r.t. masked features along one path
///
/// For a path of R replicas, the three aligned slices are
/// `x_minus = X[0..R-2]`, `x = X[1..R-1]`, `x_plus = X[2..R]`; the one-hot
/// indicator is sliced `[1..R-1]` and passed through unperturbed. Masked
/// columns are displaced by `pert` times the local inter-replica step:
///
/// ```text
/// d_plus  = pert * (x_plus - x) * mask
/// d_minus = pert * (x - x_minus) * mask
/// grad    = (f(x + d_plus) - f(x - d_minus)) / (2 * pert)
/// ```
///
/// The two endpoint replicas are the reactant/product states where a
/// directional perturbation is degenerate; they are excluded and their
/// gradient contribution is taken as zero. Returns `R - 2` scalars.
pub fn gradient_along_path<M: PathwayModel>(
    model: &M,
    x_path: ArrayView2<'_, f64>,
    xpoh_path: ArrayView2<'_, f64>,
    mask: ArrayView1<'_, f64>,
    pert: f64,
) -> Result<Array1<f64>> {
    let nrep = x_path.nrows();
    if nrep < 3 {
        return Err(Error::ShapeMismatch(format!(
            "path has {nrep} replicas, need at least 3 for interior gradients"
        )));
    }
    if xpoh_path.nrows() != nrep {
        return Err(Error::ShapeMismatch(format!(
            "path has {nrep} feature rows but {} one-hot rows",
            xpoh_path.nrows()
        )));
    }
    if mask.len() != x_path.ncols() {
        return Err(Error::ShapeMismatch(format!(
            "mask has {} entries for {} feature columns",
            mask.len(),
            x_path.ncols()
        )));
    }

    let x_minus = x_path.slice_axis(Axis(0), (0..nrep - 2).into());
    let x = x_path.slice_axis(Axis(0), (1..nrep - 1).into());
    let x_plus = x_path.slice_axis(Axis(0), (2..nrep).into());
    let xpoh = xpoh_path.slice_axis(Axis(0), (1..nrep - 1).into());

    // Unmasked columns keep a displacement of exactly zero.
    let d_plus = (&x_plus - &x) * pert * &mask;
    let d_minus = (&x - &x_minus) * pert * &mask;

    let f_plus = model.predict((&x + &d_plus).view(), xpoh)?;
    let f_minus = model.predict((&x - &d_minus).view(), xpoh)?;

    Ok((f_plus - f_minus) / (2.0 * pert))
}

/// Gradient sequences for a set of paths, shape `(paths, R - 2)`
///
/// `path_ids` selects which pathways of `dataset` to probe; rows of the
/// result follow the order of `path_ids`.
pub fn gradients_for_group<M: PathwayModel>(
    model: &M,
    dataset: &Dataset,
    indexer: &PathIndexer,
    mask: ArrayView1<'_, f64>,
    path_ids: &[usize],
    pert: f64,
) -> Result<Array2<f64>> {
    if path_ids.is_empty() {
        return Err(Error::EmptySelection(
            "no paths selected for gradient computation".to_string(),
        ));
    }

    let mut grads = Array2::zeros((path_ids.len(), indexer.nrep() - 2));
    for (row, &pid) in path_ids.iter().enumerate() {
        let x_path = indexer.path(&dataset.x, pid)?;
        let xpoh_path = indexer.path(&dataset.xpoh, pid)?;
        let grad = gradient_along_path(model, x_path, xpoh_path, mask, pert)?;
        grads.row_mut(row).assign(&grad);
    }
    Ok(grads)
}
