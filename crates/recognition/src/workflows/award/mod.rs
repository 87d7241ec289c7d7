//! Best-employee-of-the-quarter workflow core.
//!
//! The pipeline runs selection → quorum → shortlist → rating → scoring:
//! eligible employees narrow a large candidate pool to five finalists,
//! every rater scores each finalist against the 13-criterion rubric,
//! and the scoring engine ranks finalists and records the winner. Pools
//! of five or fewer skip the voting phases entirely.

pub mod domain;
pub(crate) mod eligibility;
mod error;
pub mod memory;
pub(crate) mod phase;
pub(crate) mod rating;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub(crate) mod shortlist;
pub(crate) mod voting;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateScore, CompletionState, EligiblePool, Period, PeriodId, Phase, RatingScores,
    RatingUpdate, Role, UserId, VotingStatus, Winner, CRITERIA_COUNT, MAX_CRITERION_SCORE,
    MIN_CRITERION_SCORE, SHORTLIST_SIZE,
};
pub use error::WorkflowError;
pub use memory::{InMemoryAwardRepository, StaticRoleDirectory};
pub use repository::{
    AwardRepository, DirectoryError, RepositoryError, RoleDirectory,
};
pub use router::award_router;
pub use service::AwardService;
