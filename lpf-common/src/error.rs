//! Common error types for LPF

use thiserror::Error;

/// Common result type for LPF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across LPF services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required external provider is not configured (missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream provider failure (transport, non-2xx status, or decode)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Local rendering failure
    #[error("Render error: {0}")]
    Render(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
