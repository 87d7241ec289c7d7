use tracing::warn;

use super::domain::{EligiblePool, Role};
use super::repository::{DirectoryError, RoleDirectory};

/// Resolves the candidate and rater pools for a period from the host
/// role directory. Recomputed on every call because role assignments
/// change between calls; never cached here.
pub struct EligibilityResolver<'a, D> {
    directory: &'a D,
}

impl<'a, D: RoleDirectory> EligibilityResolver<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Regular employees only: admins and supervisors are excluded from
    /// both pools. The rater pool is the candidate pool (self-rating is
    /// allowed). Fails closed to empty pools when the directory is
    /// unavailable.
    pub fn resolve_pool(&self) -> EligiblePool {
        match self.try_resolve() {
            Ok(pool) => pool,
            Err(err) => {
                warn!(%err, "role directory unavailable, failing closed to empty pools");
                EligiblePool::default()
            }
        }
    }

    fn try_resolve(&self) -> Result<EligiblePool, DirectoryError> {
        let mut candidates = Vec::new();
        for user in self.directory.roster()? {
            if matches!(self.directory.classify(&user)?, Role::Regular) {
                candidates.push(user);
            }
        }
        Ok(EligiblePool {
            raters: candidates.clone(),
            candidates,
        })
    }
}
