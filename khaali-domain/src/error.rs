use crate::model::ParticipantId;
use thiserror::Error;

/// An expense value could not be interpreted as a decimal, or the
/// aggregation left the representable decimal range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("amount `{value}` of expense paid by {payer} is not a valid decimal")]
    InvalidAmount { payer: ParticipantId, value: String },
    #[error("share `{value}` of participant {participant} is not a valid decimal")]
    InvalidShare {
        participant: ParticipantId,
        value: String,
    },
    #[error("decimal overflow while aggregating expense paid by {payer}")]
    Overflow { payer: ParticipantId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown split policy `{0}`")]
pub struct ParseSplitPolicyError(pub String);
