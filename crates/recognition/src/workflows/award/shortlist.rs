use std::cmp::Reverse;

use super::domain::{PeriodId, UserId, VotingStatus, SHORTLIST_SIZE};
use super::error::WorkflowError;
use super::repository::AwardRepository;

/// The ≤5 finalists for a period. Small pools pass through whole, in
/// insertion order, regardless of quorum; larger pools are narrowed by
/// vote tally once quorum is met.
pub(crate) fn compute_shortlist<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    status: &VotingStatus,
) -> Result<Vec<UserId>, WorkflowError> {
    let ranked = ranked_candidates(repository, period, status)?;
    Ok(ranked
        .into_iter()
        .take(SHORTLIST_SIZE)
        .map(|(candidate, _)| candidate)
        .collect())
}

/// Top `n` candidates with their tallies, under the same quorum gate
/// and ordering as the shortlist.
pub(crate) fn top_candidates<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    status: &VotingStatus,
    n: usize,
) -> Result<Vec<(UserId, usize)>, WorkflowError> {
    let mut ranked = ranked_candidates(repository, period, status)?;
    ranked.truncate(n);
    Ok(ranked)
}

/// Candidates ordered by descending tally. The candidate list arrives
/// in pool insertion order and the sort is stable, so equal tallies at
/// the cutoff boundary resolve by insertion order deterministically.
fn ranked_candidates<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    status: &VotingStatus,
) -> Result<Vec<(UserId, usize)>, WorkflowError> {
    let pool = repository.candidates(period)?;
    if pool.len() <= SHORTLIST_SIZE {
        return Ok(pool.into_iter().map(|candidate| (candidate, 0)).collect());
    }
    if !status.quorum_met() {
        return Err(WorkflowError::QuorumNotMet {
            completed: status.completed_count,
            required: status.required_count,
        });
    }

    let tallies = repository.tally_votes(period)?;
    let mut ranked: Vec<(UserId, usize)> = pool
        .into_iter()
        .map(|candidate| {
            let tally = tallies.get(&candidate).copied().unwrap_or(0);
            (candidate, tally)
        })
        .collect();
    ranked.sort_by_key(|(_, tally)| Reverse(*tally));
    Ok(ranked)
}
