//! Crate error types

use thiserror::Error;

/// Errors raised at the edges of the permission system
///
/// Evaluation itself never fails: an unknown subject or an unmatched rule
/// simply denies. These errors only come from parsing actions and loading
/// policy configuration.
#[derive(Error, Debug)]
pub enum CorralError {
    /// Action name not in the CRUDM set
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Policy configuration is structurally valid JSON but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CorralError {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        CorralError::InvalidConfig(msg.into())
    }
}

/// Result type alias for fallible corral operations
pub type CorralResult<T> = Result<T, CorralError>;
