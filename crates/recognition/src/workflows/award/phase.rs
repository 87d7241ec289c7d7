use super::domain::{Phase, VotingStatus, SHORTLIST_SIZE};

/// Derives one rater's current phase from ledger facts. Never stored:
/// recomputing on every read keeps the phase consistent with the
/// ledgers by construction.
///
/// `active_rating_complete` carries the client-side "candidate being
/// rated right now" hint: `Some(false)` while that finalist's row is
/// still incomplete, which is the only way to land in `Rate`.
pub(crate) fn resolve_phase(
    pool_size: usize,
    status: &VotingStatus,
    voter_completed: bool,
    ratings_done: bool,
    active_rating_complete: Option<bool>,
) -> Phase {
    if pool_size > SHORTLIST_SIZE {
        if !voter_completed {
            return Phase::Select;
        }
        if !status.quorum_met() {
            return Phase::Waiting;
        }
    }
    if ratings_done {
        return Phase::Done;
    }
    match active_rating_complete {
        Some(false) => Phase::Rate,
        _ => Phase::Shortlist,
    }
}
