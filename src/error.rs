//! Application-level error type returned by the command-line entry point.

use crate::postprocessor::PostProcessorError;

/// Top-level error reported by [`crate::run`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the system boundary.
    #[error("{0}")]
    Io(String),

    /// The job file or configuration file could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Post-processing failed; the inner message comes from [`PostProcessorError`].
    #[error("{0}")]
    PostProcessor(String),
}

impl From<PostProcessorError> for AppError {
    fn from(e: PostProcessorError) -> Self {
        Self::PostProcessor(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidInput(e.to_string())
    }
}
