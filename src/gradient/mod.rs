//! Finite-difference gradients along reaction paths
//!
//! The estimator probes the trained regressor with forward/backward
//! perturbations of the masked feature columns, sized relative to the local
//! path displacement rather than as a fixed epsilon. The integrator then
//! collapses each path's gradient sequence into one scalar per feature
//! group.

mod estimator;
mod integrate;

pub use estimator::{gradient_along_path, gradients_for_group, DEFAULT_PERT};
pub use integrate::{integrate_path, integrate_paths};
