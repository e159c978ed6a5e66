use serde::{Deserialize, Serialize};

/// Total/success/failure tally for one bucket or one aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentCount {
    pub total: i64,
    pub success: i64,
    pub failure: i64,
}

/// One dense-series entry: bucket start plus its full tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDayCount {
    pub time: i64,
    pub deployments: DeploymentCount,
}

/// One dense-series entry carrying a single count (per-series day lists in
/// the health dashboard and the per-workload series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCount {
    pub time: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDeploymentInfo {
    pub count: i64,
    pub production: i64,
    pub non_production: i64,
    pub count_list: Vec<DayCount>,
}

/// Success or failure trend: period count, percent change vs. the previous
/// period, and the per-day count series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTrendInfo {
    pub count: i64,
    pub rate: f64,
    pub count_list: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDashboard {
    pub total: TotalDeploymentInfo,
    pub success: DeploymentTrendInfo,
    pub failure: DeploymentTrendInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDashboard {
    pub executions: Vec<ExecutionDayCount>,
}

/// Most recent execution observed for a workload in the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastExecutionInfo {
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub status: String,
    pub deployment_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStat {
    pub workload_id: String,
    pub workload_name: Option<String>,
    pub total_deployments: i64,
    pub total_deployment_change_rate: f64,
    pub success_count: i64,
    pub percent_success: f64,
    pub rate_success: f64,
    pub failure_count: i64,
    pub failure_rate: f64,
    pub failure_rate_change_rate: f64,
    pub frequency: f64,
    pub frequency_change_rate: f64,
    pub last_executed: LastExecutionInfo,
    pub deployment_type_list: Vec<String>,
    pub count_list: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadDashboard {
    pub workloads: Vec<WorkloadStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTagInfo {
    pub service_name: String,
    pub service_tag: Option<String>,
}

/// One listed execution. `service_info_list` is omitted from the JSON when
/// the tag side-map had no entry for the execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatusEntry {
    pub name: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_info_list: Option<Vec<ServiceTagInfo>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusListDashboard {
    pub failure: Vec<DeploymentStatusEntry>,
    pub active: Vec<DeploymentStatusEntry>,
    pub pending: Vec<DeploymentStatusEntry>,
}

/// Aggregate summary of a period against the equal-length period before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub start_time: i64,
    pub end_time: i64,
    pub total_deployments: i64,
    pub total_deployment_change_rate: f64,
    pub failure_rate: f64,
    pub failure_rate_change_rate: f64,
    pub frequency: f64,
    pub frequency_change_rate: f64,
    pub executions: Vec<ExecutionDayCount>,
}
