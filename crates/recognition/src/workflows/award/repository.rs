use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::domain::{Period, PeriodId, RatingScores, RatingUpdate, Role, UserId, Winner};

/// Storage abstraction for the award ledgers. Every method is the
/// atomicity unit: a call commits wholly or not at all, so concurrent
/// submissions for the same key serialize rather than interleave.
pub trait AwardRepository: Send + Sync {
    fn upsert_period(&self, period: Period) -> Result<(), RepositoryError>;
    fn period(&self, id: &PeriodId) -> Result<Option<Period>, RepositoryError>;
    fn active_period(&self) -> Result<Option<Period>, RepositoryError>;

    /// Writes the candidate pool for a period in its given order. A
    /// no-op once the pool is seeded; the pool is never mutated after.
    fn seed_candidates(&self, period: &PeriodId, candidates: &[UserId])
        -> Result<(), RepositoryError>;
    /// Candidate pool in insertion order.
    fn candidates(&self, period: &PeriodId) -> Result<Vec<UserId>, RepositoryError>;

    /// Replaces the voter's whole pick set in one commit.
    fn replace_votes(
        &self,
        period: &PeriodId,
        voter: &UserId,
        picks: &[UserId],
    ) -> Result<(), RepositoryError>;
    fn votes_for(&self, period: &PeriodId, voter: &UserId) -> Result<Vec<UserId>, RepositoryError>;
    /// Vote count per candidate across all voters.
    fn tally_votes(&self, period: &PeriodId) -> Result<BTreeMap<UserId, usize>, RepositoryError>;

    /// Idempotent: the first call records the timestamp, later calls
    /// leave it untouched.
    fn mark_vote_completed(
        &self,
        period: &PeriodId,
        voter: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    fn vote_completed(&self, period: &PeriodId, voter: &UserId) -> Result<bool, RepositoryError>;
    fn completed_vote_count(&self, period: &PeriodId) -> Result<usize, RepositoryError>;

    /// Applies a validated criterion-level update to the stored row
    /// under the repository's lock and returns the merged result.
    fn merge_rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
        update: &RatingUpdate,
    ) -> Result<RatingScores, RepositoryError>;
    fn rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
    ) -> Result<Option<RatingScores>, RepositoryError>;
    fn ratings_by_rater(
        &self,
        period: &PeriodId,
        rater: &UserId,
    ) -> Result<BTreeMap<UserId, RatingScores>, RepositoryError>;
    fn ratings_for_candidate(
        &self,
        period: &PeriodId,
        candidate: &UserId,
    ) -> Result<Vec<(UserId, RatingScores)>, RepositoryError>;

    fn record_winner(&self, period: &PeriodId, winner: Winner) -> Result<(), RepositoryError>;
    fn winner(&self, period: &PeriodId) -> Result<Option<Winner>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Role source injected by the host identity system. Mutable between
/// calls, so eligibility is recomputed per call rather than cached.
pub trait RoleDirectory: Send + Sync {
    /// Every known user, in join order.
    fn roster(&self) -> Result<Vec<UserId>, DirectoryError>;
    fn classify(&self, user: &UserId) -> Result<Role, DirectoryError>;
}

/// Directory lookup error.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("role directory unavailable: {0}")]
    Unavailable(String),
}
