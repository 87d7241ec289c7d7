use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of rubric questions every finalist is scored against.
pub const CRITERIA_COUNT: usize = 13;
/// Maximum number of finalists that proceed to the rating phase.
pub const SHORTLIST_SIZE: usize = 5;
/// Lowest admissible criterion score.
pub const MIN_CRITERION_SCORE: u8 = 1;
/// Highest admissible criterion score.
pub const MAX_CRITERION_SCORE: u8 = 5;

/// Identifier wrapper for employees known to the host directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for one quarterly window, e.g. `2026-q3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodId(pub String);

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One quarterly recognition window. Created by the host scheduler and
/// immutable once `completed` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub year: i32,
    pub quarter: u8,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub active: bool,
    pub completed: bool,
}

/// Role classification supplied by the host directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Supervisor,
    Regular,
}

/// Candidate and rater sets for one period. The same regular-employee
/// pool serves both roles; raters may rate themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligiblePool {
    pub candidates: Vec<UserId>,
    pub raters: Vec<UserId>,
}

impl EligiblePool {
    /// Voting only happens when the candidate pool is large enough to
    /// need narrowing.
    pub fn voting_required(&self) -> bool {
        self.candidates.len() > SHORTLIST_SIZE
    }
}

/// Quorum gauge polled by clients while the selection phase runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingStatus {
    pub required_count: usize,
    pub completed_count: usize,
}

impl VotingStatus {
    /// Quorum requires every live rater to have finished; a zero-sized
    /// rater pool (directory failed closed) keeps the gate shut.
    pub fn quorum_met(&self) -> bool {
        self.required_count > 0 && self.completed_count >= self.required_count
    }
}

/// How many of the 13 criteria a rating row has filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    None,
    Draft,
    Complete,
}

impl CompletionState {
    pub const fn label(self) -> &'static str {
        match self {
            CompletionState::None => "none",
            CompletionState::Draft => "draft",
            CompletionState::Complete => "complete",
        }
    }
}

/// One rater's 13 ordered criterion scores for one finalist. Slots are
/// unset until scored; set values are always within 1..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScores {
    criteria: [Option<u8>; CRITERIA_COUNT],
}

impl RatingScores {
    /// Value for a 1-based criterion number, if set.
    pub fn value(&self, criterion: usize) -> Option<u8> {
        self.criteria.get(criterion.wrapping_sub(1)).copied().flatten()
    }

    /// The 13 slots in rubric order.
    pub fn values(&self) -> [Option<u8>; CRITERIA_COUNT] {
        self.criteria
    }

    pub fn filled_count(&self) -> usize {
        self.criteria.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn total(&self) -> u32 {
        self.criteria
            .iter()
            .flatten()
            .map(|score| u32::from(*score))
            .sum()
    }

    pub fn completion_state(&self) -> CompletionState {
        match self.filled_count() {
            0 => CompletionState::None,
            CRITERIA_COUNT => CompletionState::Complete,
            _ => CompletionState::Draft,
        }
    }

    /// Merge an already-validated update: provided entries overwrite
    /// (or clear, when null) their slot; absent entries are preserved.
    pub fn apply(&mut self, update: &RatingUpdate) {
        for (criterion, value) in &update.entries {
            self.criteria[criterion - 1] = *value;
        }
    }
}

/// Partial rating submission keyed by 1-based criterion number. An
/// explicit null clears a previously scored criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingUpdate {
    pub entries: BTreeMap<usize, Option<u8>>,
}

impl RatingUpdate {
    pub fn set(mut self, criterion: usize, value: u8) -> Self {
        self.entries.insert(criterion, Some(value));
        self
    }

    pub fn clear(mut self, criterion: usize) -> Self {
        self.entries.insert(criterion, None);
        self
    }

    /// All 13 criteria set to the same value, for bulk submissions.
    pub fn uniform(value: u8) -> Self {
        (1..=CRITERIA_COUNT).fold(Self::default(), |update, criterion| {
            update.set(criterion, value)
        })
    }
}

/// Aggregate score for one finalist, derived from every rater with any
/// recorded scores for that finalist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate: UserId,
    pub total_score: u32,
    pub num_raters: usize,
    pub percent: f64,
}

/// Persisted winner row, upserted once the period's engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub candidate: UserId,
    pub total_score: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Per-rater workflow phase, recomputed from the ledgers on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Select,
    Waiting,
    Shortlist,
    Rate,
    Done,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Select => "select",
            Phase::Waiting => "waiting",
            Phase::Shortlist => "shortlist",
            Phase::Rate => "rate",
            Phase::Done => "done",
        }
    }
}
