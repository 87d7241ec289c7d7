use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use recognition::config::DirectoryConfig;
use recognition::workflows::award::{Period, PeriodId, StaticRoleDirectory, UserId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Role directory seeded from the APP_ROSTER / APP_ADMINS /
/// APP_SUPERVISORS env lists. Stands in for the host identity system
/// when the service runs standalone.
pub(crate) fn directory_from_config(config: &DirectoryConfig) -> StaticRoleDirectory {
    StaticRoleDirectory::new(
        config.roster.iter().cloned().map(UserId),
        config.admins.iter().cloned().map(UserId),
        config.supervisors.iter().cloned().map(UserId),
    )
}

/// The calendar quarter containing `today`, flagged active. The real
/// host scheduler owns period creation; the demo and standalone mode
/// derive one from the clock.
pub(crate) fn current_quarter() -> Period {
    let today = Utc::now().date_naive();
    let quarter = (today.month0() / 3 + 1) as u8;
    let start_month = (u32::from(quarter) - 1) * 3 + 1;
    let starts_on = NaiveDate::from_ymd_opt(today.year(), start_month, 1)
        .unwrap_or(today);
    let ends_on = if quarter == 4 {
        NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today)
    } else {
        NaiveDate::from_ymd_opt(today.year(), start_month + 3, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(today)
    };

    Period {
        id: PeriodId(format!("{}-q{}", today.year(), quarter)),
        year: today.year(),
        quarter,
        starts_on,
        ends_on,
        active: true,
        completed: false,
    }
}
