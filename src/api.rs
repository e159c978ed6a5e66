use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dashboard::buckets::{day_floor, DAY_MS};
use crate::dashboard::status::{ACTIVE_STATUSES, FAILED_STATUSES, PENDING_STATUSES};
use crate::dashboard::types::{
    DeploymentSummary, ExecutionDashboard, HealthDashboard, StatusListDashboard, WorkloadDashboard,
};
use crate::dashboard::{execution, health, status_list, summary, workload};
use crate::db;
use crate::error::DashboardError;
use crate::models::Scope;
use crate::state::AppState;

const DEFAULT_STATUS_LIST_LIMIT: i64 = 20;

#[derive(Deserialize, Clone, Debug)]
pub struct DashboardFilter {
    account_id: Option<String>,
    org_id: Option<String>,
    project_id: Option<String>,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
    previous_start_ts: Option<i64>,
    env_type: Option<String>,
    limit: Option<i64>,
}

impl DashboardFilter {
    fn scope(&self) -> Scope {
        Scope {
            account_id: self.account_id.clone(),
            org_id: self.org_id.clone(),
            project_id: self.project_id.clone(),
        }
    }

    fn range(&self) -> Result<(i64, i64), ApiError> {
        let start = require_param(self.start_ts, "start_ts")?;
        let end = require_param(self.end_ts, "end_ts")?;
        Ok((start, end))
    }
}

fn require_param(value: Option<i64>, name: &str) -> Result<i64, ApiError> {
    value.ok_or_else(|| ApiError::bad_request(format!("missing query parameter: {name}")))
}

/// Error response for the dashboard API. Aggregation-contract violations
/// map to 400, storage failures to 500.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("dashboard query failed: {:#}", err);
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "internal error".to_string() }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard/health", get(get_health_dashboard))
        .route("/api/dashboard/executions", get(get_execution_dashboard))
        .route("/api/dashboard/workloads", get(get_workload_dashboard))
        .route("/api/dashboard/status-list", get(get_status_list))
        .route("/api/dashboard/summary", get(get_deployment_summary))
        .with_state(state)
}

async fn get_health_dashboard(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<HealthDashboard>, ApiError> {
    let scope = filter.scope();
    let (start, end) = filter.range()?;
    let previous_start = require_param(filter.previous_start_ts, "previous_start_ts")?;

    let key = format!("health:{:?}:{}:{}:{}", scope, start, end, previous_start);
    if let Some(cached) = cached_response::<HealthDashboard>(&state, &key) {
        return Ok(Json(cached));
    }

    let window_end = day_floor(end) + DAY_MS;
    let rows = db::fetch_status_time_rows(&state.db, &scope, previous_start, window_end).await?;
    let env_types = db::fetch_env_types(&state.db, &scope, start, window_end).await?;
    let dashboard = health::health_dashboard(&rows, &env_types, start, end)?;

    cache_response(&state, key, &dashboard).await;
    Ok(Json(dashboard))
}

async fn get_execution_dashboard(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<ExecutionDashboard>, ApiError> {
    let scope = filter.scope();
    let (start, end) = filter.range()?;

    let key = format!("executions:{:?}:{}:{}", scope, start, end);
    if let Some(cached) = cached_response::<ExecutionDashboard>(&state, &key) {
        return Ok(Json(cached));
    }

    let window_end = day_floor(end) + DAY_MS;
    let rows = db::fetch_status_time_rows(&state.db, &scope, start, window_end).await?;
    let dashboard = execution::execution_dashboard(&rows, start, end)?;

    cache_response(&state, key, &dashboard).await;
    Ok(Json(dashboard))
}

async fn get_workload_dashboard(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<WorkloadDashboard>, ApiError> {
    let scope = filter.scope();
    let (start, end) = filter.range()?;
    let previous_start = require_param(filter.previous_start_ts, "previous_start_ts")?;

    let key = format!(
        "workloads:{:?}:{}:{}:{}:{:?}",
        scope, start, end, previous_start, filter.env_type
    );
    if let Some(cached) = cached_response::<WorkloadDashboard>(&state, &key) {
        return Ok(Json(cached));
    }

    let window_end = day_floor(end) + DAY_MS;
    let rows = db::fetch_workload_rows(
        &state.db,
        &scope,
        previous_start,
        window_end,
        filter.env_type.as_deref(),
    )
    .await?;
    let names = db::workload_name_map(&rows);
    let dashboard = workload::workload_dashboard(&rows, &names, start, end)?;

    cache_response(&state, key, &dashboard).await;
    Ok(Json(dashboard))
}

async fn get_status_list(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<StatusListDashboard>, ApiError> {
    let scope = filter.scope();
    let limit = filter
        .limit
        .or(state.config.dashboard.status_list_limit)
        .unwrap_or(DEFAULT_STATUS_LIST_LIMIT);

    let failure = fetch_category(&state, &scope, FAILED_STATUSES, limit).await?;
    let active = fetch_category(&state, &scope, ACTIVE_STATUSES, limit).await?;
    let pending = fetch_category(&state, &scope, PENDING_STATUSES, limit).await?;

    let dashboard = status_list::status_lists(
        (&failure.0, &failure.1),
        (&active.0, &active.1),
        (&pending.0, &pending.1),
    );
    Ok(Json(dashboard))
}

type CategoryPage = (
    Vec<crate::models::ExecutionPageRow>,
    std::collections::HashMap<String, Vec<crate::dashboard::types::ServiceTagInfo>>,
);

async fn fetch_category(
    state: &AppState,
    scope: &Scope,
    statuses: &[&str],
    limit: i64,
) -> Result<CategoryPage, ApiError> {
    let rows = db::fetch_status_page(&state.db, scope, statuses, limit).await?;
    let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
    let tags = db::fetch_service_tags(&state.db, &ids).await?;
    Ok((rows, tags))
}

async fn get_deployment_summary(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<DeploymentSummary>, ApiError> {
    let scope = filter.scope();
    let (start, end) = filter.range()?;

    let key = format!("summary:{:?}:{}:{}", scope, start, end);
    if let Some(cached) = cached_response::<DeploymentSummary>(&state, &key) {
        return Ok(Json(cached));
    }

    let window_end = day_floor(end) + DAY_MS;
    let rows = db::fetch_status_time_rows(&state.db, &scope, start, window_end).await?;
    let current = execution::execution_dashboard(&rows, start, end)?;

    let (previous_start, previous_end) = summary::previous_period(start, end);
    let previous_rows =
        db::fetch_status_time_rows(&state.db, &scope, previous_start, previous_end + DAY_MS).await?;
    let previous = execution::execution_dashboard(&previous_rows, previous_start, previous_end)?;

    let summary =
        summary::deployment_summary(&current.executions, &previous.executions, start, end)?;

    cache_response(&state, key, &summary).await;
    Ok(Json(summary))
}

fn cached_response<T: for<'de> Deserialize<'de>>(state: &AppState, key: &str) -> Option<T> {
    let cached = state.cache.get(key)?;
    serde_json::from_value(cached).ok()
}

async fn cache_response<T: Serialize>(state: &AppState, key: String, value: &T) {
    if let Ok(value) = serde_json::to_value(value) {
        state.cache.insert(key, value).await;
    }
}
