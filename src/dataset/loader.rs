//! Dataset loading keyed by (system, mechanism)

use crate::error::{Error, Result};
use crate::features::Mechanism;
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One (system, mechanism) dataset, read-only to the attribution core
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix, rows = replicas ordered by path then replica index
    pub x: Array2<f64>,
    /// One-hot path indicator, passed to the model unperturbed
    pub xpoh: Array2<f64>,
    /// Reference relative energies, one per replica
    pub y: Array1<f64>,
}

impl Dataset {
    /// Number of replica rows
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of feature columns
    pub fn feature_width(&self) -> usize {
        self.x.ncols()
    }

    /// Check row alignment across the three arrays
    pub fn validate(&self) -> Result<()> {
        if self.xpoh.nrows() != self.x.nrows() {
            return Err(Error::ShapeMismatch(format!(
                "x has {} rows but x_onehot has {}",
                self.x.nrows(),
                self.xpoh.nrows()
            )));
        }
        if self.y.len() != self.x.nrows() {
            return Err(Error::ShapeMismatch(format!(
                "x has {} rows but y has {}",
                self.x.nrows(),
                self.y.len()
            )));
        }
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let mut file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
}

fn matrix_from_rows(rows: Vec<Vec<f64>>, what: &str) -> Result<Array2<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != ncols {
            return Err(Error::ShapeMismatch(format!(
                "{what}: row {i} has {} columns, expected {ncols}",
                row.len()
            )));
        }
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| Error::ShapeMismatch(format!("{what}: {e}")))
}

/// Load the `x` / `x_onehot` / `y` arrays for one (system, mechanism)
///
/// File naming follows the upstream data-preparation convention:
/// `{system}.{mechanism}.x.json` and friends under `dir`.
pub fn load_dataset(dir: impl AsRef<Path>, system: &str, mechanism: Mechanism) -> Result<Dataset> {
    let dir = dir.as_ref();
    let tag = mechanism.tag();

    let x_rows: Vec<Vec<f64>> = read_json(&dir.join(format!("{system}.{tag}.x.json")))?;
    let xpoh_rows: Vec<Vec<f64>> = read_json(&dir.join(format!("{system}.{tag}.x_onehot.json")))?;
    let y_vals: Vec<f64> = read_json(&dir.join(format!("{system}.{tag}.y.json")))?;

    let dataset = Dataset {
        x: matrix_from_rows(x_rows, "x")?,
        xpoh: matrix_from_rows(xpoh_rows, "x_onehot")?,
        y: Array1::from_vec(y_vals),
    };
    dataset.validate()?;
    Ok(dataset)
}

/// Load the cached model predictions for one (system, mechanism)
///
/// Produced once at training time, aligned row-for-row with `x`; lets the
/// reweighting stage derive barriers without re-evaluating the model.
pub fn load_predictions(
    dir: impl AsRef<Path>,
    system: &str,
    mechanism: Mechanism,
) -> Result<Array1<f64>> {
    let path = dir
        .as_ref()
        .join(format!("{system}.{}.y_pred.json", mechanism.tag()));
    let vals: Vec<f64> = read_json(&path)?;
    Ok(Array1::from_vec(vals))
}

/// Load feature-column labels, if the upstream stage shipped them
pub fn load_feature_labels(
    dir: impl AsRef<Path>,
    system: &str,
    mechanism: Mechanism,
) -> Result<Vec<String>> {
    let path = dir
        .as_ref()
        .join(format!("{system}.{}.xlbl.json", mechanism.tag()));
    read_json(&path)
}
