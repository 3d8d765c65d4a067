//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent shape violations in the loaded data.
/// These are independent of where the data came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed tree at {path}: {reason}")]
    MalformedTree { path: String, reason: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid {chart} payload: {reason}")]
    InvalidPayload { chart: String, reason: String },
}

impl DomainError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn payload(chart: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            chart: chart.into(),
            reason: reason.into(),
        }
    }
}
