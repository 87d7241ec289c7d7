use std::collections::BTreeSet;

use chrono::Utc;

use super::domain::{PeriodId, UserId, VotingStatus, SHORTLIST_SIZE};
use super::error::WorkflowError;
use super::repository::AwardRepository;

/// Replaces the voter's pick set wholesale after validating size and
/// pool membership. Nothing is written when validation fails.
pub(crate) fn submit_votes<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    voter: &UserId,
    picks: &[UserId],
) -> Result<(), WorkflowError> {
    let pool = repository.candidates(period)?;
    if pool.len() <= SHORTLIST_SIZE {
        return Err(WorkflowError::InvalidSelection {
            reason: format!(
                "voting is skipped for pools of {} candidates or fewer",
                SHORTLIST_SIZE
            ),
        });
    }
    if picks.len() != SHORTLIST_SIZE {
        return Err(WorkflowError::InvalidSelection {
            reason: format!("expected exactly {} picks, got {}", SHORTLIST_SIZE, picks.len()),
        });
    }

    let mut seen = BTreeSet::new();
    for pick in picks {
        if !seen.insert(pick) {
            return Err(WorkflowError::InvalidSelection {
                reason: format!("duplicate pick {pick}"),
            });
        }
        if !pool.contains(pick) {
            return Err(WorkflowError::InvalidSelection {
                reason: format!("{pick} is not a candidate for period {period}"),
            });
        }
    }

    repository.replace_votes(period, voter, picks)?;
    Ok(())
}

/// Marks the voter's selection complete. Idempotent; rejects voters
/// whose committed pick set is not yet full.
pub(crate) fn mark_completed<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    voter: &UserId,
) -> Result<(), WorkflowError> {
    let have = repository.votes_for(period, voter)?.len();
    if have != SHORTLIST_SIZE {
        return Err(WorkflowError::IncompleteVoteSet {
            have,
            need: SHORTLIST_SIZE,
        });
    }
    repository.mark_vote_completed(period, voter, Utc::now())?;
    Ok(())
}

/// Quorum gauge: how many of the live rater pool have finished voting.
pub(crate) fn voting_status<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    rater_pool_size: usize,
) -> Result<VotingStatus, WorkflowError> {
    Ok(VotingStatus {
        required_count: rater_pool_size,
        completed_count: repository.completed_vote_count(period)?,
    })
}

/// Current selection for UI prefill, completed or not.
pub(crate) fn user_votes<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    voter: &UserId,
) -> Result<Vec<UserId>, WorkflowError> {
    Ok(repository.votes_for(period, voter)?)
}
