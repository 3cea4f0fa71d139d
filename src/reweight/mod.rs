//! Barrier-based statistical reweighting
//!
//! Per-path integrated gradients are aggregated with two multiplicative
//! weights derived from the predicted barrier heights: a density weight
//! (Gaussian or 2-component Gaussian mixture) that suppresses statistical
//! outliers, and a Boltzmann weight that suppresses kinetically irrelevant
//! high-barrier paths. A path must score on both to contribute strongly.

mod density;
mod engine;
mod gmm;

pub use density::{boltzmann_density, gaussian_density, BOLTZMANN_KB, DEFAULT_TEMPERATURE};
pub use engine::{reweight_contribution, DensityKind};
pub use gmm::GaussianMixture;
