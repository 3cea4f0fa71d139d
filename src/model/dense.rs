//! Feed-forward regressor with a late one-hot merge

use super::PathwayModel;
use crate::error::{Error, Result};
use crate::features::Mechanism;
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// max(0, z)
    Relu,
    /// Identity (output head)
    Linear,
}

impl Activation {
    fn apply(&self, z: &mut Array2<f64>) {
        if *self == Activation::Relu {
            z.mapv_inplace(|v| v.max(0.0));
        }
    }
}

/// One dense layer, weights stored (input, output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Build a layer from row-major weights and a bias vector
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>, activation: Activation) -> Self {
        Self {
            weights,
            bias,
            activation,
        }
    }

    fn to_arrays(&self) -> Result<(Array2<f64>, Array1<f64>)> {
        let n_in = self.weights.len();
        let n_out = self.weights.first().map_or(0, Vec::len);
        for (i, row) in self.weights.iter().enumerate() {
            if row.len() != n_out {
                return Err(Error::ShapeMismatch(format!(
                    "dense layer weight row {i} has {} columns, expected {n_out}",
                    row.len()
                )));
            }
        }
        if self.bias.len() != n_out {
            return Err(Error::ShapeMismatch(format!(
                "dense layer bias has {} entries for {n_out} outputs",
                self.bias.len()
            )));
        }
        let flat: Vec<f64> = self.weights.iter().flatten().copied().collect();
        let w = Array2::from_shape_vec((n_in, n_out), flat)
            .map_err(|e| Error::ShapeMismatch(format!("dense layer weights: {e}")))?;
        Ok((w, Array1::from_vec(self.bias.clone())))
    }
}

struct CompiledLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl CompiledLayer {
    fn forward(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        if input.ncols() != self.weights.nrows() {
            return Err(Error::ShapeMismatch(format!(
                "layer expects {} inputs, got {}",
                self.weights.nrows(),
                input.ncols()
            )));
        }
        let mut z = input.dot(&self.weights) + &self.bias;
        self.activation.apply(&mut z);
        Ok(z)
    }
}

/// Serialized model state, as written by the training stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    /// Model name recorded at training time
    pub name: String,
    /// Layers applied to the feature input before the one-hot merge
    pub hidden: Vec<DenseLayer>,
    /// Layers applied after concatenating the one-hot indicator
    pub head: Vec<DenseLayer>,
}

/// Feed-forward regressor: dense stack on features, one-hot concatenated
/// before the head, scalar output
pub struct DenseModel {
    name: String,
    hidden: Vec<CompiledLayer>,
    head: Vec<CompiledLayer>,
}

impl DenseModel {
    /// Compile a model from its serialized state
    pub fn from_state(state: ModelState) -> Result<Self> {
        let compile = |layers: &[DenseLayer]| -> Result<Vec<CompiledLayer>> {
            layers
                .iter()
                .map(|l| {
                    let (weights, bias) = l.to_arrays()?;
                    Ok(CompiledLayer {
                        weights,
                        bias,
                        activation: l.activation,
                    })
                })
                .collect()
        };

        let hidden = compile(&state.hidden)?;
        let head = compile(&state.head)?;
        match head.last() {
            Some(out) if out.weights.ncols() == 1 => {}
            Some(out) => {
                return Err(Error::ShapeMismatch(format!(
                    "model head produces {} outputs, expected scalar",
                    out.weights.ncols()
                )))
            }
            None => {
                return Err(Error::ShapeMismatch(
                    "model has no head layers".to_string(),
                ))
            }
        }

        Ok(Self {
            name: state.name,
            hidden,
            head,
        })
    }

    /// Model name recorded at training time
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PathwayModel for DenseModel {
    fn predict(&self, x: ArrayView2<'_, f64>, xpoh: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if x.nrows() != xpoh.nrows() {
            return Err(Error::ShapeMismatch(format!(
                "x has {} rows but x_onehot has {}",
                x.nrows(),
                xpoh.nrows()
            )));
        }

        let mut h = x.to_owned();
        for layer in &self.hidden {
            h = layer.forward(&h)?;
        }

        let mut z = concatenate(Axis(1), &[h.view(), xpoh.view()])
            .map_err(|e| Error::ShapeMismatch(format!("one-hot merge: {e}")))?;
        for layer in &self.head {
            z = layer.forward(&z)?;
        }

        Ok(z.column(0).to_owned())
    }
}

/// Load a trained model for one (system, mechanism)
///
/// Reads `{system}.{mechanism}.model.json` under `dir` and compiles it.
pub fn load_model(dir: impl AsRef<Path>, system: &str, mechanism: Mechanism) -> Result<DenseModel> {
    let path = dir
        .as_ref()
        .join(format!("{system}.{}.model.json", mechanism.tag()));
    let mut file = File::open(&path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    let state: ModelState = serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    DenseModel::from_state(state)
}
