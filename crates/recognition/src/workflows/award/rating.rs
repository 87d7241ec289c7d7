use std::collections::BTreeMap;

use super::domain::{
    CompletionState, PeriodId, RatingScores, RatingUpdate, UserId, CRITERIA_COUNT,
    MAX_CRITERION_SCORE, MIN_CRITERION_SCORE,
};
use super::error::WorkflowError;
use super::repository::AwardRepository;

/// Validate-then-write rating upsert. Every entry is checked before
/// anything is stored; criteria absent from the update keep their
/// stored values. Returns the completion state of the merged row.
pub(crate) fn submit_rating<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    shortlist: &[UserId],
    rater: &UserId,
    candidate: &UserId,
    update: &RatingUpdate,
) -> Result<CompletionState, WorkflowError> {
    validate_update(update)?;
    if !shortlist.contains(candidate) {
        return Err(WorkflowError::NotInShortlist {
            candidate: candidate.clone(),
        });
    }
    let merged = repository.merge_rating(period, rater, candidate, update)?;
    Ok(merged.completion_state())
}

/// Rejects the whole update on the first bad entry: unknown criterion
/// numbers and out-of-range scores both surface as `InvalidRatingValue`.
fn validate_update(update: &RatingUpdate) -> Result<(), WorkflowError> {
    for (&criterion, &value) in &update.entries {
        let known = (1..=CRITERIA_COUNT).contains(&criterion);
        let in_range = value
            .map(|score| (MIN_CRITERION_SCORE..=MAX_CRITERION_SCORE).contains(&score))
            .unwrap_or(true);
        if !known || !in_range {
            return Err(WorkflowError::InvalidRatingValue { criterion, value });
        }
    }
    Ok(())
}

pub(crate) fn user_rating<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    rater: &UserId,
    candidate: &UserId,
) -> Result<Option<RatingScores>, WorkflowError> {
    Ok(repository.rating(period, rater, candidate)?)
}

/// Bulk prefill for a rater across the whole shortlist.
pub(crate) fn user_ratings_map<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    rater: &UserId,
) -> Result<BTreeMap<UserId, RatingScores>, WorkflowError> {
    Ok(repository.ratings_by_rater(period, rater)?)
}

/// A rater is done when every shortlisted finalist's row is complete.
/// An empty shortlist never counts as done (there is nothing to rate).
pub(crate) fn all_complete<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    shortlist: &[UserId],
    rater: &UserId,
) -> Result<bool, WorkflowError> {
    if shortlist.is_empty() {
        return Ok(false);
    }
    for candidate in shortlist {
        let state = repository
            .rating(period, rater, candidate)?
            .map(|scores| scores.completion_state())
            .unwrap_or(CompletionState::None);
        if state != CompletionState::Complete {
            return Ok(false);
        }
    }
    Ok(true)
}
