//! Error types for core module
//!
//! Provides custom error types for configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Config file I/O error
    #[error("Config I/O error at {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// Config values out of range
    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
