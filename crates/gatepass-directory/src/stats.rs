//! Derived dashboard figures.
//!
//! Pure functions over record snapshots; nothing here holds state.

use chrono::{DateTime, Duration, Utc};
use gatepass_core::constants::OVERDUE_AFTER_HOURS;
use serde::Serialize;

use crate::emergency::EmergencyRecord;
use crate::record::VisitRecord;

/// How many of the most recent check-ins appear in the activity feed.
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Visits per department, with the share of today's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCount {
    pub name: &'static str,
    pub count: usize,
    /// Rounded percentage of all counted visits.
    pub percentage: u32,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub name: String,
    pub action: &'static str,
    pub at: DateTime<Utc>,
}

/// Everything the front-desk dashboard shows at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Visitors currently on site.
    pub current_visitors: usize,
    /// Visits that checked in today (UTC calendar day).
    pub today_visitors: usize,
    /// Still checked in after more than four hours.
    pub overdue_count: usize,
    pub active_emergencies: usize,
    /// Per-department visit counts, busiest first.
    pub department_data: Vec<DepartmentCount>,
    /// Latest check-ins, newest first.
    pub recent_activity: Vec<ActivityEntry>,
}

/// Computes the dashboard from visit and emergency snapshots at `now`.
#[must_use]
pub fn dashboard(
    visits: &[VisitRecord],
    emergencies: &[EmergencyRecord],
    now: DateTime<Utc>,
) -> DashboardSnapshot {
    let today = now.date_naive();
    let overdue_after = Duration::hours(OVERDUE_AFTER_HOURS);

    let current_visitors = visits.iter().filter(|v| v.is_checked_in()).count();
    let today_visitors = visits
        .iter()
        .filter(|v| v.check_in_time.date_naive() == today)
        .count();
    let overdue_count = visits
        .iter()
        .filter(|v| v.is_checked_in() && now - v.check_in_time > overdue_after)
        .count();
    let active_emergencies = emergencies.iter().filter(|e| e.is_active()).count();

    DashboardSnapshot {
        current_visitors,
        today_visitors,
        overdue_count,
        active_emergencies,
        department_data: department_data(visits),
        recent_activity: recent_activity(visits),
    }
}

/// Visit counts per department, busiest first, percentages over all
/// visits on record. Departments nobody visited are omitted.
fn department_data(visits: &[VisitRecord]) -> Vec<DepartmentCount> {
    let total = visits.len();
    let mut counts: Vec<DepartmentCount> = gatepass_core::Purpose::ALL
        .iter()
        .filter_map(|purpose| {
            let count = visits.iter().filter(|v| v.purpose == *purpose).count();
            (count > 0).then(|| DepartmentCount {
                name: purpose.as_str(),
                count,
                percentage: percentage(count, total),
            })
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(b.name)));
    counts
}

fn recent_activity(visits: &[VisitRecord]) -> Vec<ActivityEntry> {
    let mut sorted: Vec<&VisitRecord> = visits.iter().collect();
    sorted.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
    sorted
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|v| ActivityEntry {
            name: v.full_name(),
            action: "checked in",
            at: v.check_in_time,
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((count as f64 / total as f64) * 100.0).round() as u32
    }
}
