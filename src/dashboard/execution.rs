use crate::dashboard::buckets;
use crate::dashboard::status::{classify, StatusCategory};
use crate::dashboard::types::{DeploymentCount, ExecutionDashboard, ExecutionDayCount};
use crate::error::{DashboardError, Result};
use crate::models::StatusTimeRow;

/// Build the dense per-day execution series for `[start_interval,
/// end_interval]`. Every calendar day in the range gets an entry, zero-valued
/// days included; a row outside the range is a caller error.
pub fn execution_dashboard(
    rows: &[StatusTimeRow],
    start_interval: i64,
    end_interval: i64,
) -> Result<ExecutionDashboard> {
    if start_interval > end_interval {
        return Err(DashboardError::InvalidInterval { start: start_interval, end: end_interval });
    }

    let days = buckets::day_buckets(start_interval, end_interval);
    let mut counts = vec![DeploymentCount::default(); days.len()];

    for row in rows {
        let idx = buckets::bucket_index(row.start_ts, &days)?;
        counts[idx].total += 1;
        match classify(&row.status) {
            StatusCategory::Success => counts[idx].success += 1,
            StatusCategory::Failure => counts[idx].failure += 1,
            _ => {}
        }
    }

    let executions = days
        .into_iter()
        .zip(counts)
        .map(|(time, deployments)| ExecutionDayCount { time, deployments })
        .collect();

    Ok(ExecutionDashboard { executions })
}
