use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{Period, PeriodId, RatingScores, RatingUpdate, Role, UserId, Winner};
use super::repository::{
    AwardRepository, DirectoryError, RepositoryError, RoleDirectory,
};

#[derive(Default)]
struct Store {
    periods: HashMap<PeriodId, Period>,
    candidates: HashMap<PeriodId, Vec<UserId>>,
    votes: HashMap<(PeriodId, UserId), Vec<UserId>>,
    completions: HashMap<PeriodId, BTreeMap<UserId, DateTime<Utc>>>,
    ratings: BTreeMap<(PeriodId, UserId, UserId), RatingScores>,
    winners: HashMap<PeriodId, Winner>,
}

/// Mutex-guarded in-memory ledger store. One lock per store keeps every
/// trait method an atomic unit; suitable for the standalone service,
/// the demo, and tests. Production hosts supply their own store.
#[derive(Default)]
pub struct InMemoryAwardRepository {
    store: Mutex<Store>,
}

impl AwardRepository for InMemoryAwardRepository {
    fn upsert_period(&self, period: Period) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store.periods.insert(period.id.clone(), period);
        Ok(())
    }

    fn period(&self, id: &PeriodId) -> Result<Option<Period>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.periods.get(id).cloned())
    }

    fn active_period(&self) -> Result<Option<Period>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.periods.values().find(|period| period.active).cloned())
    }

    fn seed_candidates(
        &self,
        period: &PeriodId,
        candidates: &[UserId],
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
            .candidates
            .entry(period.clone())
            .or_insert_with(|| candidates.to_vec());
        Ok(())
    }

    fn candidates(&self, period: &PeriodId) -> Result<Vec<UserId>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.candidates.get(period).cloned().unwrap_or_default())
    }

    fn replace_votes(
        &self,
        period: &PeriodId,
        voter: &UserId,
        picks: &[UserId],
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
            .votes
            .insert((period.clone(), voter.clone()), picks.to_vec());
        Ok(())
    }

    fn votes_for(&self, period: &PeriodId, voter: &UserId) -> Result<Vec<UserId>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .votes
            .get(&(period.clone(), voter.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn tally_votes(&self, period: &PeriodId) -> Result<BTreeMap<UserId, usize>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        let mut tallies = BTreeMap::new();
        for ((vote_period, _), picks) in &store.votes {
            if vote_period != period {
                continue;
            }
            for pick in picks {
                *tallies.entry(pick.clone()).or_insert(0) += 1;
            }
        }
        Ok(tallies)
    }

    fn mark_vote_completed(
        &self,
        period: &PeriodId,
        voter: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
            .completions
            .entry(period.clone())
            .or_default()
            .entry(voter.clone())
            .or_insert(at);
        Ok(())
    }

    fn vote_completed(&self, period: &PeriodId, voter: &UserId) -> Result<bool, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .completions
            .get(period)
            .map(|rows| rows.contains_key(voter))
            .unwrap_or(false))
    }

    fn completed_vote_count(&self, period: &PeriodId) -> Result<usize, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.completions.get(period).map(BTreeMap::len).unwrap_or(0))
    }

    fn merge_rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
        update: &RatingUpdate,
    ) -> Result<RatingScores, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        let row = store
            .ratings
            .entry((period.clone(), rater.clone(), candidate.clone()))
            .or_default();
        row.apply(update);
        Ok(*row)
    }

    fn rating(
        &self,
        period: &PeriodId,
        rater: &UserId,
        candidate: &UserId,
    ) -> Result<Option<RatingScores>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .ratings
            .get(&(period.clone(), rater.clone(), candidate.clone()))
            .copied())
    }

    fn ratings_by_rater(
        &self,
        period: &PeriodId,
        rater: &UserId,
    ) -> Result<BTreeMap<UserId, RatingScores>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .ratings
            .iter()
            .filter(|((row_period, row_rater, _), _)| row_period == period && row_rater == rater)
            .map(|((_, _, candidate), scores)| (candidate.clone(), *scores))
            .collect())
    }

    fn ratings_for_candidate(
        &self,
        period: &PeriodId,
        candidate: &UserId,
    ) -> Result<Vec<(UserId, RatingScores)>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .ratings
            .iter()
            .filter(|((row_period, _, row_candidate), _)| {
                row_period == period && row_candidate == candidate
            })
            .map(|((_, rater, _), scores)| (rater.clone(), *scores))
            .collect())
    }

    fn record_winner(&self, period: &PeriodId, winner: Winner) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store.winners.insert(period.clone(), winner);
        Ok(())
    }

    fn winner(&self, period: &PeriodId) -> Result<Option<Winner>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.winners.get(period).cloned())
    }
}

/// Fixed role directory seeded at startup. Every listed user classifies
/// as regular unless named in the admin or supervisor sets.
#[derive(Default)]
pub struct StaticRoleDirectory {
    roster: Vec<UserId>,
    admins: HashSet<UserId>,
    supervisors: HashSet<UserId>,
}

impl StaticRoleDirectory {
    pub fn new<I, A, S>(roster: I, admins: A, supervisors: S) -> Self
    where
        I: IntoIterator<Item = UserId>,
        A: IntoIterator<Item = UserId>,
        S: IntoIterator<Item = UserId>,
    {
        Self {
            roster: roster.into_iter().collect(),
            admins: admins.into_iter().collect(),
            supervisors: supervisors.into_iter().collect(),
        }
    }
}

impl RoleDirectory for StaticRoleDirectory {
    fn roster(&self) -> Result<Vec<UserId>, DirectoryError> {
        Ok(self.roster.clone())
    }

    fn classify(&self, user: &UserId) -> Result<Role, DirectoryError> {
        if self.admins.contains(user) {
            Ok(Role::Admin)
        } else if self.supervisors.contains(user) {
            Ok(Role::Supervisor)
        } else {
            Ok(Role::Regular)
        }
    }
}
