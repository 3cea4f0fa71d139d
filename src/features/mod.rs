//! Feature groups and the per-mechanism registry
//!
//! A feature group is a named, chemically interpretable subset of feature
//! columns (a bond-forming coordinate, a proton-transfer pair, ...). The
//! column indices differ between the two supported reaction mechanisms, so
//! the registry keeps one explicit table per mechanism.

mod registry;

pub use registry::{FeatureGroupRegistry, Mechanism};
