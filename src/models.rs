use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account/org/project scoping for a dashboard query. Absent fields are not
/// filtered on, matching the upstream store's scoping rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scope {
    pub account_id: Option<String>,
    pub org_id: Option<String>,
    pub project_id: Option<String>,
}

/// Minimal projection used by the health and execution trends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusTimeRow {
    pub status: String,
    pub start_ts: i64,
}

/// One execution row for the categorized listings. `end_ts` is already
/// resolved by the query layer (open-ended executions get the query time).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExecutionPageRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub start_ts: i64,
    pub end_ts: i64,
}

/// One service-deployment row for the workload dashboard, spanning the
/// previous and current periods.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkloadRow {
    pub workload_id: Option<String>,
    pub workload_name: Option<String>,
    pub status: String,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub deployment_type: Option<String>,
}

/// One service-tag row keyed by its owning execution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceTagRow {
    pub execution_id: String,
    pub service_name: String,
    pub tag: Option<String>,
}
