//! Error taxonomy for loading the dashboard.

use thiserror::Error;

/// The snapshot handed over by a source violates the data contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot is missing required field `{0}`")]
    MissingField(String),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("duplicate transaction id `{0}`")]
    DuplicateTransaction(String),
}

impl SnapshotError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        SnapshotError::MissingField(field.into())
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SnapshotError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why a dashboard ended up in the failed state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch dashboard snapshot: {0:#}")]
    Fetch(anyhow::Error),

    #[error("malformed dashboard snapshot: {0}")]
    Malformed(#[from] SnapshotError),
}

impl LoadError {
    /// Short label for the failure class, shown in the failure panel.
    pub fn class(&self) -> &'static str {
        match self {
            LoadError::Fetch(_) => "Fetch failure",
            LoadError::Malformed(_) => "Malformed snapshot",
        }
    }
}
