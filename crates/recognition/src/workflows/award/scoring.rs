use super::domain::{
    CandidateScore, CompletionState, PeriodId, UserId, CRITERIA_COUNT, MAX_CRITERION_SCORE,
};
use super::error::WorkflowError;
use super::repository::AwardRepository;

/// Aggregates every recorded rating, complete or draft, per finalist.
/// `percent` is the share of the theoretical maximum for the number of
/// distinct raters who scored anything, and 0 when nobody has.
pub(crate) fn compute_scores<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    shortlist: &[UserId],
) -> Result<Vec<CandidateScore>, WorkflowError> {
    shortlist
        .iter()
        .map(|candidate| {
            let mut total_score = 0u32;
            let mut num_raters = 0usize;
            for (_, scores) in repository.ratings_for_candidate(period, candidate)? {
                if scores.filled_count() == 0 {
                    continue;
                }
                num_raters += 1;
                total_score += scores.total();
            }
            let max = num_raters * CRITERIA_COUNT * MAX_CRITERION_SCORE as usize;
            let percent = if num_raters == 0 {
                0.0
            } else {
                f64::from(total_score) / max as f64 * 100.0
            };
            Ok(CandidateScore {
                candidate: candidate.clone(),
                total_score,
                num_raters,
                percent,
            })
        })
        .collect()
}

/// The period's winner: highest aggregate total among the finalists.
/// `None` until at least one finalist holds a complete rating. Equal
/// totals resolve to the finalist earliest in shortlist order.
pub(crate) fn compute_winner<R: AwardRepository>(
    repository: &R,
    period: &PeriodId,
    shortlist: &[UserId],
) -> Result<Option<CandidateScore>, WorkflowError> {
    let mut any_complete = false;
    for candidate in shortlist {
        let complete = repository
            .ratings_for_candidate(period, candidate)?
            .iter()
            .any(|(_, scores)| scores.completion_state() == CompletionState::Complete);
        if complete {
            any_complete = true;
            break;
        }
    }
    if !any_complete {
        return Ok(None);
    }

    let scores = compute_scores(repository, period, shortlist)?;
    Ok(pick_winner(&scores).cloned())
}

/// Strictly-greater comparison keeps the first maximum, so ties break
/// by shortlist order.
fn pick_winner(scores: &[CandidateScore]) -> Option<&CandidateScore> {
    scores
        .iter()
        .filter(|score| score.num_raters > 0)
        .fold(None, |best: Option<&CandidateScore>, score| match best {
            Some(current) if score.total_score > current.total_score => Some(score),
            Some(current) => Some(current),
            None => Some(score),
        })
}
