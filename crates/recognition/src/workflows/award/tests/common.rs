use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::workflows::award::domain::{
    EligiblePool, Period, PeriodId, RatingUpdate, Role, UserId,
};
use crate::workflows::award::memory::{InMemoryAwardRepository, StaticRoleDirectory};
use crate::workflows::award::repository::{DirectoryError, RoleDirectory};
use crate::workflows::award::service::AwardService;

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn users(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|id| user(id)).collect()
}

pub(super) fn period_id() -> PeriodId {
    PeriodId("2026-q3".to_string())
}

pub(super) fn period() -> Period {
    Period {
        id: period_id(),
        year: 2026,
        quarter: 3,
        starts_on: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid start"),
        ends_on: NaiveDate::from_ymd_opt(2026, 9, 30).expect("valid end"),
        active: true,
        completed: false,
    }
}

pub(super) type MemoryService = AwardService<InMemoryAwardRepository, StaticRoleDirectory>;

/// Service over in-memory ports with the period already opened.
/// `regulars` become the candidate/rater pool in the given order.
pub(super) fn build_service(
    regulars: &[&str],
    supervisors: &[&str],
    admins: &[&str],
) -> (Arc<MemoryService>, EligiblePool) {
    let roster: Vec<UserId> = regulars
        .iter()
        .chain(supervisors)
        .chain(admins)
        .map(|id| user(id))
        .collect();
    let directory = StaticRoleDirectory::new(roster, users(admins), users(supervisors));
    let service = Arc::new(AwardService::new(
        Arc::new(InMemoryAwardRepository::default()),
        Arc::new(directory),
    ));
    let pool = service.open_period(period()).expect("period opens");
    (service, pool)
}

/// Seven-candidate pool used by the quorum scenarios.
pub(super) fn seven_pool() -> (Arc<MemoryService>, Vec<UserId>) {
    let (service, pool) = build_service(
        &["p1", "p2", "p3", "p4", "p5", "p6", "p7"],
        &["sup1"],
        &["admin"],
    );
    (service, pool.candidates)
}

/// Every voter submits the given picks and marks completion, reaching
/// quorum when `voters` covers the whole rater pool.
pub(super) fn reach_quorum<R, D>(service: &AwardService<R, D>, voters: &[UserId], picks: &[UserId])
where
    R: crate::workflows::award::repository::AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    for voter in voters {
        service
            .submit_votes(&period_id(), voter, picks)
            .expect("votes accepted");
        service
            .mark_completed(&period_id(), voter)
            .expect("completion accepted");
    }
}

/// A rating update summing to `total` across all 13 criteria. Only
/// totals reachable with scores in 1..=5 are supported.
pub(super) fn update_totalling(total: u8) -> RatingUpdate {
    let base = total / 13;
    let rest = total % 13;
    let mut update = RatingUpdate::default();
    for criterion in 1..=13 {
        let value = if criterion <= usize::from(rest) {
            base + 1
        } else {
            base
        };
        update = update.set(criterion, value);
    }
    update
}

/// Directory double whose availability can be flipped mid-test.
pub(super) struct ToggleDirectory {
    inner: StaticRoleDirectory,
    available: AtomicBool,
}

impl ToggleDirectory {
    pub(super) fn new(inner: StaticRoleDirectory) -> Self {
        Self {
            inner,
            available: AtomicBool::new(true),
        }
    }

    pub(super) fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl RoleDirectory for ToggleDirectory {
    fn roster(&self) -> Result<Vec<UserId>, DirectoryError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable(
                "identity service offline".to_string(),
            ));
        }
        self.inner.roster()
    }

    fn classify(&self, user: &UserId) -> Result<Role, DirectoryError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable(
                "identity service offline".to_string(),
            ));
        }
        self.inner.classify(user)
    }
}
