use khaali_domain::ComputationError;
use thiserror::Error;

use crate::model::GroupId;

/// The data-access layer could not supply a group's expenses.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read expense data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed expense data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("group {0} not found")]
    UnknownGroup(GroupId),
}

#[derive(Debug, Error)]
pub enum DebtError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}
