//! Error types for the rendering core

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the rendering core
#[derive(Error, Debug)]
pub enum Error {
    /// A layout parameter was outside its valid domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A style-set document failed validation at load time
    #[error("Invalid style set: {0}")]
    InvalidStyleSet(String),

    /// Network error while talking to the sheet endpoint
    #[cfg(feature = "sheets")]
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The sheet endpoint returned something other than a row array
    #[cfg(feature = "sheets")]
    #[error("Unexpected sheet format: {0}")]
    FormatError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
