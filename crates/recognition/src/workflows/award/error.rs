use super::domain::UserId;
use super::repository::RepositoryError;

/// Precondition failures for award operations. All are scoped to one
/// caller's one request and are never retried by this crate.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid selection: {reason}")]
    InvalidSelection { reason: String },
    #[error("vote set incomplete: {have} of {need} picks recorded")]
    IncompleteVoteSet { have: usize, need: usize },
    #[error("quorum not met: {completed} of {required} voters completed")]
    QuorumNotMet { completed: usize, required: usize },
    #[error("criterion {criterion} value {value:?} is outside 1..=5")]
    InvalidRatingValue { criterion: usize, value: Option<u8> },
    #[error("candidate {candidate} is not in the shortlist")]
    NotInShortlist { candidate: UserId },
    #[error("no active period")]
    NoActivePeriod,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
