use std::collections::HashMap;

use crate::dashboard::buckets::{self, DAY_MS};
use crate::dashboard::rates::{percent_change, percentage};
use crate::dashboard::status::{classify, StatusCategory};
use crate::dashboard::types::{DayCount, LastExecutionInfo, WorkloadDashboard, WorkloadStat};
use crate::error::{DashboardError, Result};
use crate::models::WorkloadRow;

#[derive(Default)]
struct WorkloadTally {
    total: i64,
    success: i64,
    failure: i64,
    prev_total: i64,
    prev_success: i64,
    prev_failure: i64,
    day_counts: Vec<i64>,
    deployment_types: Vec<String>,
    last: Option<LastExecutionInfo>,
}

/// Build per-workload deployment stats for `[start_interval, end_interval]`.
///
/// `rows` must span the previous and current periods; rows outside the
/// current window feed each workload's previous-period baseline. Rows
/// without a workload id are skipped. Output order is the first occurrence
/// of each workload id in `rows`; workloads with no current-period
/// deployments are omitted.
pub fn workload_dashboard(
    rows: &[WorkloadRow],
    names: &HashMap<String, String>,
    start_interval: i64,
    end_interval: i64,
) -> Result<WorkloadDashboard> {
    if start_interval > end_interval {
        return Err(DashboardError::InvalidInterval { start: start_interval, end: end_interval });
    }

    let days = buckets::day_buckets(start_interval, end_interval);
    let window_end = days.last().copied().unwrap_or(start_interval) + DAY_MS;

    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, WorkloadTally> = HashMap::new();

    for row in rows {
        let workload_id = match &row.workload_id {
            Some(id) => id,
            None => continue,
        };
        let tally = tallies.entry(workload_id.clone()).or_insert_with(|| {
            order.push(workload_id.clone());
            WorkloadTally { day_counts: vec![0; days.len()], ..WorkloadTally::default() }
        });

        if row.start_ts >= start_interval && row.start_ts < window_end {
            let idx = buckets::bucket_index(row.start_ts, &days)?;
            tally.total += 1;
            tally.day_counts[idx] += 1;
            match classify(&row.status) {
                StatusCategory::Success => tally.success += 1,
                StatusCategory::Failure => tally.failure += 1,
                _ => {}
            }
            if let Some(deployment_type) = &row.deployment_type {
                tally.deployment_types.push(deployment_type.clone());
            }
            // latest start wins; first seen wins on ties
            if tally.last.as_ref().map_or(true, |last| last.start_ts < row.start_ts) {
                tally.last = Some(LastExecutionInfo {
                    start_ts: row.start_ts,
                    end_ts: row.end_ts,
                    status: row.status.clone(),
                    deployment_type: row.deployment_type.clone(),
                });
            }
        } else {
            tally.prev_total += 1;
            match classify(&row.status) {
                StatusCategory::Success => tally.prev_success += 1,
                StatusCategory::Failure => tally.prev_failure += 1,
                _ => {}
            }
        }
    }

    let day_count = days.len() as f64;
    let mut workloads = Vec::with_capacity(order.len());
    for workload_id in order {
        let tally = match tallies.remove(&workload_id) {
            Some(t) => t,
            None => continue,
        };
        let last_executed = match tally.last {
            Some(last) if tally.total > 0 => last,
            _ => continue,
        };

        let frequency = tally.total as f64 / day_count;
        let prev_frequency = tally.prev_total as f64 / day_count;
        let count_list = days
            .iter()
            .zip(&tally.day_counts)
            .map(|(time, count)| DayCount { time: *time, count: *count })
            .collect();

        workloads.push(WorkloadStat {
            workload_name: names.get(&workload_id).cloned(),
            workload_id,
            total_deployments: tally.total,
            total_deployment_change_rate: percent_change(tally.total as f64, tally.prev_total as f64),
            success_count: tally.success,
            percent_success: percentage(tally.success, tally.total),
            rate_success: percent_change(tally.success as f64, tally.prev_success as f64),
            failure_count: tally.failure,
            failure_rate: percentage(tally.failure, tally.total),
            failure_rate_change_rate: percent_change(tally.failure as f64, tally.prev_failure as f64),
            frequency,
            frequency_change_rate: percent_change(frequency, prev_frequency),
            last_executed,
            deployment_type_list: tally.deployment_types,
            count_list,
        });
    }

    Ok(WorkloadDashboard { workloads })
}
