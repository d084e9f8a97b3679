//! Publishing error types.

use crate::utils::exec::ExecError;
use thiserror::Error;

/// Failure of one publish attempt.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A git invocation exited non-zero. Holds its diagnostic text verbatim.
    #[error("{0}")]
    Command(String),

    /// Anything else (folder preparation, file I/O, spawning git).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ExecError> for PublishError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Failed { message, .. } => Self::Command(message),
            other => Self::Other(other.into()),
        }
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.into())
    }
}
