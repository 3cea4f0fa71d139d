//! Reaction-path datasets: flat replica-ordered arrays and path windows
//!
//! Upstream data preparation produces, per (system, mechanism), a feature
//! matrix `x`, a one-hot path indicator `x_onehot`, reference energies `y`,
//! and cached model predictions `y_pred`, all aligned row-for-row. Rows are
//! replicas, grouped contiguously into pathways of a fixed replica count.

mod barriers;
mod loader;
mod paths;

pub use barriers::predicted_barriers;
pub use loader::{load_dataset, load_feature_labels, load_predictions, Dataset};
pub use paths::PathIndexer;
