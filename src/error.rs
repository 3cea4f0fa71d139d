//! Crate-wide error types

use thiserror::Error;

/// Errors produced by the attribution pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown mechanism: {0}")]
    UnknownMechanism(String),

    #[error("Unknown feature group '{group}' for mechanism {mechanism}")]
    UnknownFeatureGroup {
        /// Mechanism the lookup was made against
        mechanism: String,
        /// Requested group name
        group: String,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Empty selection: {0}")]
    EmptySelection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for attribution operations
pub type Result<T> = std::result::Result<T, Error>;
