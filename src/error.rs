//! Error types for the qspr-epochs crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by epoch tracking, persistence and the training wrappers.
#[derive(Debug, Error)]
pub enum EarlyStoppingError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Training cancelled after {epochs_run} epoch(s)")]
    Cancelled { epochs_run: usize },

    #[error("Malformed early stopping file {}: {reason}", .path.display())]
    MalformedFile { path: PathBuf, reason: String },

    #[error("Unknown aggregate function: {0}")]
    UnknownAggregate(String),

    #[error("Unknown early stopping mode: {0}")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EarlyStoppingError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
