use crate::dashboard::buckets::{day_floor, DAY_MS};
use crate::dashboard::rates::{percent_change, percentage};
use crate::dashboard::types::{DeploymentSummary, ExecutionDayCount};
use crate::error::{DashboardError, Result};

/// Bounds of the equal-length period immediately preceding
/// `[start, end]`: same number of days, ending the day before `start`.
pub fn previous_period(start: i64, end: i64) -> (i64, i64) {
    let start_day = day_floor(start);
    let len = day_floor(end) + DAY_MS - start_day;
    (start_day - len, start_day - DAY_MS)
}

fn totals(series: &[ExecutionDayCount]) -> (i64, i64) {
    series.iter().fold((0, 0), |(total, failure), entry| {
        (total + entry.deployments.total, failure + entry.deployments.failure)
    })
}

/// Summarize a period's dense day series against the preceding period's:
/// totals, failure percentage, per-day frequency, and the change rate of
/// each.
pub fn deployment_summary(
    current: &[ExecutionDayCount],
    previous: &[ExecutionDayCount],
    start_time: i64,
    end_time: i64,
) -> Result<DeploymentSummary> {
    if start_time > end_time {
        return Err(DashboardError::InvalidInterval { start: start_time, end: end_time });
    }

    let (total, failure) = totals(current);
    let (prev_total, prev_failure) = totals(previous);

    let failure_rate = percentage(failure, total);
    let prev_failure_rate = percentage(prev_failure, prev_total);

    let days = current.len().max(1) as f64;
    let frequency = total as f64 / days;
    let prev_frequency = prev_total as f64 / days;

    Ok(DeploymentSummary {
        start_time,
        end_time,
        total_deployments: total,
        total_deployment_change_rate: percent_change(total as f64, prev_total as f64),
        failure_rate,
        failure_rate_change_rate: percent_change(failure_rate, prev_failure_rate),
        frequency,
        frequency_change_rate: percent_change(frequency, prev_frequency),
        executions: current.to_vec(),
    })
}
