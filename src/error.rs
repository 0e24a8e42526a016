//! Error types for the statement service.

use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while storing or rendering statements.
#[derive(Error, Debug)]
pub enum Error {
    /// A requested document does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// PDF composition failed before any output could be finalized.
    #[error("rendering failed: {0}")]
    Render(String),

    /// The backing database rejected an operation or returned a document
    /// that could not be decoded.
    #[error("store failure: {0}")]
    Store(String),

    /// A request body could not be decoded into the wire model.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Startup configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<genpdf::error::Error> for Error {
    fn from(err: genpdf::error::Error) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Store(err.to_string())
    }
}
