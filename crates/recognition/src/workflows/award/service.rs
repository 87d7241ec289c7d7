use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    CandidateScore, CompletionState, EligiblePool, Period, PeriodId, Phase, RatingScores,
    RatingUpdate, UserId, VotingStatus, Winner, SHORTLIST_SIZE,
};
use super::eligibility::EligibilityResolver;
use super::error::WorkflowError;
use super::repository::{AwardRepository, RepositoryError, RoleDirectory};
use super::{rating, scoring, shortlist, voting};

/// Facade composing the eligibility resolver, the vote and rating
/// ledgers, the shortlist selector, and the scoring engine over the
/// injected storage and role-directory ports.
pub struct AwardService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
}

impl<R, D> AwardService<R, D>
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// The period currently flagged active by the host scheduler.
    pub fn active_period(&self) -> Result<Period, WorkflowError> {
        self.repository
            .active_period()?
            .ok_or(WorkflowError::NoActivePeriod)
    }

    /// Registers a scheduler-created period and seeds its candidate
    /// pool once from the eligibility resolver, in roster order.
    pub fn open_period(&self, period: Period) -> Result<EligiblePool, WorkflowError> {
        let period_id = period.id.clone();
        self.repository.upsert_period(period)?;
        let pool = EligibilityResolver::new(&*self.directory).resolve_pool();
        self.repository.seed_candidates(&period_id, &pool.candidates)?;
        info!(
            period = %period_id,
            candidates = pool.candidates.len(),
            "award period opened"
        );
        Ok(pool)
    }

    /// Live candidate/rater pools. Recomputed per call; role changes in
    /// the directory show up on the next call.
    pub fn eligible_pool(&self, period: &PeriodId) -> Result<EligiblePool, WorkflowError> {
        self.require_period(period)?;
        Ok(EligibilityResolver::new(&*self.directory).resolve_pool())
    }

    pub fn submit_votes(
        &self,
        period: &PeriodId,
        voter: &UserId,
        picks: &[UserId],
    ) -> Result<(), WorkflowError> {
        self.require_period(period)?;
        voting::submit_votes(&*self.repository, period, voter, picks)
    }

    pub fn mark_completed(&self, period: &PeriodId, voter: &UserId) -> Result<(), WorkflowError> {
        self.require_period(period)?;
        voting::mark_completed(&*self.repository, period, voter)
    }

    pub fn voting_status(&self, period: &PeriodId) -> Result<VotingStatus, WorkflowError> {
        self.require_period(period)?;
        let raters = EligibilityResolver::new(&*self.directory)
            .resolve_pool()
            .raters;
        voting::voting_status(&*self.repository, period, raters.len())
    }

    pub fn user_votes(&self, period: &PeriodId, voter: &UserId) -> Result<Vec<UserId>, WorkflowError> {
        self.require_period(period)?;
        voting::user_votes(&*self.repository, period, voter)
    }

    pub fn compute_shortlist(&self, period: &PeriodId) -> Result<Vec<UserId>, WorkflowError> {
        let status = self.voting_status(period)?;
        shortlist::compute_shortlist(&*self.repository, period, &status)
    }

    pub fn top_candidates(
        &self,
        period: &PeriodId,
        n: usize,
    ) -> Result<Vec<(UserId, usize)>, WorkflowError> {
        let status = self.voting_status(period)?;
        shortlist::top_candidates(&*self.repository, period, &status, n)
    }

    pub fn submit_rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
        update: &RatingUpdate,
    ) -> Result<CompletionState, WorkflowError> {
        let finalists = self.compute_shortlist(period)?;
        rating::submit_rating(&*self.repository, period, &finalists, rater, candidate, update)
    }

    pub fn user_rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
    ) -> Result<Option<RatingScores>, WorkflowError> {
        self.require_period(period)?;
        rating::user_rating(&*self.repository, period, rater, candidate)
    }

    pub fn user_ratings_map(
        &self,
        period: &PeriodId,
        rater: &UserId,
    ) -> Result<BTreeMap<UserId, RatingScores>, WorkflowError> {
        self.require_period(period)?;
        rating::user_ratings_map(&*self.repository, period, rater)
    }

    pub fn compute_scores(&self, period: &PeriodId) -> Result<Vec<CandidateScore>, WorkflowError> {
        let finalists = self.compute_shortlist(period)?;
        scoring::compute_scores(&*self.repository, period, &finalists)
    }

    pub fn compute_winner(
        &self,
        period: &PeriodId,
    ) -> Result<Option<CandidateScore>, WorkflowError> {
        let finalists = self.compute_shortlist(period)?;
        scoring::compute_winner(&*self.repository, period, &finalists)
    }

    /// Recomputes the winner and upserts the persisted row. The host
    /// scheduler decides when a period is final; repeated calls simply
    /// recompute and overwrite.
    pub fn record_winner(&self, period: &PeriodId) -> Result<Option<Winner>, WorkflowError> {
        let Some(score) = self.compute_winner(period)? else {
            return Ok(None);
        };
        let winner = Winner {
            candidate: score.candidate,
            total_score: score.total_score,
            recorded_at: Utc::now(),
        };
        self.repository.record_winner(period, winner.clone())?;
        info!(period = %period, candidate = %winner.candidate, "winner recorded");
        Ok(Some(winner))
    }

    pub fn recorded_winner(&self, period: &PeriodId) -> Result<Option<Winner>, WorkflowError> {
        self.require_period(period)?;
        Ok(self.repository.winner(period)?)
    }

    /// Derives the user's phase from the ledgers; nothing is stored.
    /// `active` is the client-held "finalist being rated right now"
    /// hint and is the only path into [`Phase::Rate`].
    pub fn resolve_phase(
        &self,
        period: &PeriodId,
        user: &UserId,
        active: Option<&UserId>,
    ) -> Result<Phase, WorkflowError> {
        self.require_period(period)?;
        let pool_size = self.repository.candidates(period)?.len();
        let status = self.voting_status(period)?;
        let voter_completed = self.repository.vote_completed(period, user)?;

        let shortlist_ready = pool_size <= SHORTLIST_SIZE || status.quorum_met();
        let (ratings_done, active_rating_complete) = if shortlist_ready {
            let finalists = shortlist::compute_shortlist(&*self.repository, period, &status)?;
            let done = rating::all_complete(&*self.repository, period, &finalists, user)?;
            let active_rating_complete = match active {
                Some(candidate) if finalists.contains(candidate) => {
                    let complete = self
                        .repository
                        .rating(period, user, candidate)?
                        .map(|scores| scores.completion_state() == CompletionState::Complete)
                        .unwrap_or(false);
                    Some(complete)
                }
                _ => None,
            };
            (done, active_rating_complete)
        } else {
            (false, None)
        };

        Ok(super::phase::resolve_phase(
            pool_size,
            &status,
            voter_completed,
            ratings_done,
            active_rating_complete,
        ))
    }

    fn require_period(&self, period: &PeriodId) -> Result<Period, WorkflowError> {
        self.repository
            .period(period)?
            .ok_or(WorkflowError::Repository(RepositoryError::NotFound))
    }
}
