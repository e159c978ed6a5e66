use crate::dashboard::buckets::{self, DAY_MS};
use crate::dashboard::rates::percent_change;
use crate::dashboard::status::{classify, StatusCategory};
use crate::dashboard::types::{DayCount, DeploymentTrendInfo, HealthDashboard, TotalDeploymentInfo};
use crate::error::{DashboardError, Result};
use crate::models::StatusTimeRow;

const PRODUCTION_ENV: &str = "Production";

/// Build the deployment-health dashboard for `[start_interval, end_interval]`.
///
/// `rows` must cover the current period and the immediately preceding period
/// of equal length; everything outside the current window feeds the
/// previous-period baseline the change rates are computed against.
/// `env_types` holds the environment type of each current-period service
/// deployment.
pub fn health_dashboard(
    rows: &[StatusTimeRow],
    env_types: &[String],
    start_interval: i64,
    end_interval: i64,
) -> Result<HealthDashboard> {
    if start_interval > end_interval {
        return Err(DashboardError::InvalidInterval { start: start_interval, end: end_interval });
    }

    let days = buckets::day_buckets(start_interval, end_interval);
    let window_end = days.last().copied().unwrap_or(start_interval) + DAY_MS;

    let mut total_per_day = vec![0i64; days.len()];
    let mut success_per_day = vec![0i64; days.len()];
    let mut failure_per_day = vec![0i64; days.len()];

    let mut total = 0i64;
    let mut success = 0i64;
    let mut failure = 0i64;
    let mut previous_success = 0i64;
    let mut previous_failure = 0i64;

    for row in rows {
        if row.start_ts >= start_interval && row.start_ts < window_end {
            let idx = buckets::bucket_index(row.start_ts, &days)?;
            total += 1;
            total_per_day[idx] += 1;
            match classify(&row.status) {
                StatusCategory::Success => {
                    success += 1;
                    success_per_day[idx] += 1;
                }
                StatusCategory::Failure => {
                    failure += 1;
                    failure_per_day[idx] += 1;
                }
                _ => {}
            }
        } else {
            match classify(&row.status) {
                StatusCategory::Success => previous_success += 1,
                StatusCategory::Failure => previous_failure += 1,
                _ => {}
            }
        }
    }

    let production = env_types.iter().filter(|e| e.as_str() == PRODUCTION_ENV).count() as i64;
    let non_production = env_types.len() as i64 - production;

    let count_list = |counts: &[i64]| -> Vec<DayCount> {
        days.iter()
            .zip(counts)
            .map(|(time, count)| DayCount { time: *time, count: *count })
            .collect()
    };

    Ok(HealthDashboard {
        total: TotalDeploymentInfo {
            count: total,
            production,
            non_production,
            count_list: count_list(&total_per_day),
        },
        success: DeploymentTrendInfo {
            count: success,
            rate: percent_change(success as f64, previous_success as f64),
            count_list: count_list(&success_per_day),
        },
        failure: DeploymentTrendInfo {
            count: failure,
            rate: percent_change(failure as f64, previous_failure as f64),
            count_list: count_list(&failure_per_day),
        },
    })
}
