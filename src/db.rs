use std::collections::HashMap;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, Pool, QueryBuilder, Sqlite};

use crate::dashboard::types::ServiceTagInfo;
use crate::models::{ExecutionPageRow, Scope, ServiceTagRow, StatusTimeRow, WorkloadRow};

const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pipeline_executions (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    org_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL,
    start_ts INTEGER NOT NULL,
    end_ts INTEGER
);
CREATE TABLE IF NOT EXISTS service_deployments (
    execution_id TEXT NOT NULL,
    service_id TEXT,
    service_name TEXT,
    status TEXT NOT NULL,
    start_ts INTEGER NOT NULL,
    end_ts INTEGER,
    deployment_type TEXT,
    env_type TEXT,
    tag TEXT
);
CREATE INDEX IF NOT EXISTS idx_exec_scope_start ON pipeline_executions(account_id, org_id, project_id, start_ts);
CREATE INDEX IF NOT EXISTS idx_exec_status_start ON pipeline_executions(status, start_ts DESC);
CREATE INDEX IF NOT EXISTS idx_service_execution ON service_deployments(execution_id);
"#;

/// Open the execution store and make sure the schema exists. The store is
/// populated by the pipeline service; this service only reads it.
pub async fn init_db(url: &str, max_connections: u32) -> Result<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    sqlx::query(INIT_SQL).execute(&pool).await?;
    Ok(pool)
}

fn push_scope(query_builder: &mut QueryBuilder<'_, Sqlite>, scope: &Scope) {
    if let Some(account_id) = &scope.account_id {
        query_builder.push(" AND e.account_id = ");
        query_builder.push_bind(account_id.clone());
    }
    if let Some(org_id) = &scope.org_id {
        query_builder.push(" AND e.org_id = ");
        query_builder.push_bind(org_id.clone());
    }
    if let Some(project_id) = &scope.project_id {
        query_builder.push(" AND e.project_id = ");
        query_builder.push_bind(project_id.clone());
    }
}

/// Status and start time of every execution with `start_ts` in `[from, to)`.
pub async fn fetch_status_time_rows(
    pool: &Pool<Sqlite>,
    scope: &Scope,
    from: i64,
    to: i64,
) -> Result<Vec<StatusTimeRow>> {
    let mut query_builder = QueryBuilder::new(
        "SELECT e.status, e.start_ts FROM pipeline_executions e WHERE 1=1",
    );
    push_scope(&mut query_builder, scope);
    query_builder.push(" AND e.start_ts >= ");
    query_builder.push_bind(from);
    query_builder.push(" AND e.start_ts < ");
    query_builder.push_bind(to);
    query_builder.push(" ORDER BY e.start_ts ASC");

    let rows = query_builder.build_query_as::<StatusTimeRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Environment types of the service deployments attached to executions in
/// `[from, to)`. One row per service deployment, untyped rows skipped.
pub async fn fetch_env_types(
    pool: &Pool<Sqlite>,
    scope: &Scope,
    from: i64,
    to: i64,
) -> Result<Vec<String>> {
    let mut query_builder = QueryBuilder::new(
        "SELECT s.env_type FROM service_deployments s \
         JOIN pipeline_executions e ON e.id = s.execution_id \
         WHERE s.env_type IS NOT NULL",
    );
    push_scope(&mut query_builder, scope);
    query_builder.push(" AND e.start_ts >= ");
    query_builder.push_bind(from);
    query_builder.push(" AND e.start_ts < ");
    query_builder.push_bind(to);
    query_builder.push(" ORDER BY s.rowid ASC");

    let env_types = query_builder.build_query_scalar::<String>().fetch_all(pool).await?;
    Ok(env_types)
}

/// Service-deployment rows for the workload dashboard, attached to
/// executions in `[from, to)`, optionally restricted to one environment
/// type. Ordered by service start time so downstream grouping is
/// deterministic.
pub async fn fetch_workload_rows(
    pool: &Pool<Sqlite>,
    scope: &Scope,
    from: i64,
    to: i64,
    env_type: Option<&str>,
) -> Result<Vec<WorkloadRow>> {
    let mut query_builder = QueryBuilder::new(
        "SELECT s.service_id AS workload_id, s.service_name AS workload_name, \
         s.status, s.start_ts, s.end_ts, s.deployment_type \
         FROM service_deployments s \
         JOIN pipeline_executions e ON e.id = s.execution_id \
         WHERE s.service_id IS NOT NULL AND s.service_name IS NOT NULL",
    );
    push_scope(&mut query_builder, scope);
    if let Some(env_type) = env_type {
        query_builder.push(" AND s.env_type = ");
        query_builder.push_bind(env_type.to_string());
    }
    query_builder.push(" AND e.start_ts >= ");
    query_builder.push_bind(from);
    query_builder.push(" AND e.start_ts < ");
    query_builder.push_bind(to);
    query_builder.push(" ORDER BY s.start_ts ASC, s.rowid ASC");

    let rows = query_builder.build_query_as::<WorkloadRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Display names per workload id, first name seen wins.
pub fn workload_name_map(rows: &[WorkloadRow]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for row in rows {
        if let (Some(id), Some(name)) = (&row.workload_id, &row.workload_name) {
            names.entry(id.clone()).or_insert_with(|| name.clone());
        }
    }
    names
}

/// Most recent executions in one status category, newest first. Executions
/// still running have no `end_ts` yet; the query substitutes the current
/// time, as the upstream dashboards expect a concrete bound.
pub async fn fetch_status_page(
    pool: &Pool<Sqlite>,
    scope: &Scope,
    statuses: &[&str],
    limit: i64,
) -> Result<Vec<ExecutionPageRow>> {
    let now_ms = chrono::Utc::now().timestamp_millis();

    let mut query_builder =
        QueryBuilder::new("SELECT e.id, e.name, e.status, e.start_ts, COALESCE(e.end_ts, ");
    query_builder.push_bind(now_ms);
    query_builder.push(") AS end_ts FROM pipeline_executions e WHERE 1=1");
    push_scope(&mut query_builder, scope);
    query_builder.push(" AND e.status IN (");
    let mut separated = query_builder.separated(", ");
    for status in statuses {
        separated.push_bind(status.to_string());
    }
    separated.push_unseparated(")");
    query_builder.push(" ORDER BY e.start_ts DESC LIMIT ");
    query_builder.push_bind(limit);

    let rows = query_builder.build_query_as::<ExecutionPageRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Service-tag side map for a set of execution ids, keyed by execution id
/// with tags in store order.
pub async fn fetch_service_tags(
    pool: &Pool<Sqlite>,
    execution_ids: &[String],
) -> Result<HashMap<String, Vec<ServiceTagInfo>>> {
    if execution_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query_builder = QueryBuilder::new(
        "SELECT s.execution_id, s.service_name, s.tag FROM service_deployments s \
         WHERE s.service_name IS NOT NULL AND s.execution_id IN (",
    );
    let mut separated = query_builder.separated(", ");
    for id in execution_ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
    query_builder.push(" ORDER BY s.rowid ASC");

    let rows = query_builder.build_query_as::<ServiceTagRow>().fetch_all(pool).await?;

    let mut tags: HashMap<String, Vec<ServiceTagInfo>> = HashMap::new();
    for row in rows {
        tags.entry(row.execution_id).or_default().push(ServiceTagInfo {
            service_name: row.service_name,
            service_tag: row.tag,
        });
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> Pool<Sqlite> {
        // one connection so the in-memory database is shared across queries
        init_db("sqlite::memory:", 1).await.expect("in-memory store")
    }

    async fn insert_execution(
        pool: &Pool<Sqlite>,
        id: &str,
        status: &str,
        start_ts: i64,
        end_ts: Option<i64>,
    ) {
        sqlx::query(
            "INSERT INTO pipeline_executions (id, account_id, org_id, project_id, name, status, start_ts, end_ts) \
             VALUES (?, 'acc', 'org', 'proj', ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(format!("pipeline-{id}"))
        .bind(status)
        .bind(start_ts)
        .bind(end_ts)
        .execute(pool)
        .await
        .expect("insert execution");
    }

    async fn insert_service(
        pool: &Pool<Sqlite>,
        execution_id: &str,
        service: Option<(&str, &str)>,
        env_type: Option<&str>,
        tag: Option<&str>,
    ) {
        sqlx::query(
            "INSERT INTO service_deployments \
             (execution_id, service_id, service_name, status, start_ts, end_ts, deployment_type, env_type, tag) \
             VALUES (?, ?, ?, 'SUCCESS', 0, NULL, 'kuber1', ?, ?)",
        )
        .bind(execution_id)
        .bind(service.map(|(id, _)| id))
        .bind(service.map(|(_, name)| name))
        .bind(env_type)
        .bind(tag)
        .execute(pool)
        .await
        .expect("insert service deployment");
    }

    #[tokio::test]
    async fn scoped_time_window_is_half_open() {
        let pool = test_pool().await;
        insert_execution(&pool, "e1", "SUCCESS", 100, Some(200)).await;
        insert_execution(&pool, "e2", "FAILED", 200, Some(300)).await;
        insert_execution(&pool, "e3", "SUCCESS", 300, None).await;

        let scope = Scope {
            account_id: Some("acc".to_string()),
            org_id: Some("org".to_string()),
            project_id: Some("proj".to_string()),
        };
        let rows = fetch_status_time_rows(&pool, &scope, 100, 300).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].start_ts, 100);
        assert_eq!(rows[1].status, "FAILED");

        let other_scope = Scope { account_id: Some("other".to_string()), ..Scope::default() };
        let rows = fetch_status_time_rows(&pool, &other_scope, 0, 1000).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn status_page_resolves_open_ended_executions() {
        let pool = test_pool().await;
        insert_execution(&pool, "e1", "FAILED", 100, Some(200)).await;
        insert_execution(&pool, "e2", "ABORTED", 300, None).await;
        insert_execution(&pool, "e3", "SUCCESS", 400, Some(500)).await;

        let rows = fetch_status_page(&pool, &Scope::default(), crate::dashboard::status::FAILED_STATUSES, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        // newest first
        assert_eq!(rows[0].id, "e2");
        assert!(rows[0].end_ts >= chrono::Utc::now().timestamp_millis() - 60_000);
        assert_eq!(rows[1].end_ts, 200);
    }

    #[tokio::test]
    async fn tag_map_is_keyed_by_execution_id() {
        let pool = test_pool().await;
        insert_execution(&pool, "e1", "FAILED", 100, Some(200)).await;
        insert_execution(&pool, "e2", "FAILED", 300, Some(400)).await;
        insert_service(&pool, "e1", Some(("svc1", "Service1")), Some("Production"), Some("v1")).await;
        insert_service(&pool, "e1", Some(("svc2", "Service2")), Some("Production"), None).await;

        let ids = vec!["e1".to_string(), "e2".to_string()];
        let tags = fetch_service_tags(&pool, &ids).await.unwrap();
        assert_eq!(tags.len(), 1);
        let e1 = &tags["e1"];
        assert_eq!(e1.len(), 2);
        assert_eq!(e1[0].service_name, "Service1");
        assert_eq!(e1[0].service_tag.as_deref(), Some("v1"));
        assert!(e1[1].service_tag.is_none());
        assert!(!tags.contains_key("e2"));
    }

    #[tokio::test]
    async fn workload_rows_join_scope_and_env_filters() {
        let pool = test_pool().await;
        insert_execution(&pool, "e1", "SUCCESS", 100, Some(200)).await;
        insert_execution(&pool, "e2", "FAILED", 300, Some(400)).await;
        insert_service(&pool, "e1", Some(("svc1", "Service1")), Some("Production"), None).await;
        insert_service(&pool, "e2", Some(("svc2", "Service2")), Some("PreProduction"), None).await;
        // anonymous service rows never reach the workload dashboard
        insert_service(&pool, "e2", None, Some("Production"), None).await;

        let rows = fetch_workload_rows(&pool, &Scope::default(), 0, 1000, None).await.unwrap();
        assert_eq!(rows.len(), 2);
        let names = workload_name_map(&rows);
        assert_eq!(names["svc1"], "Service1");
        assert_eq!(names["svc2"], "Service2");

        let production =
            fetch_workload_rows(&pool, &Scope::default(), 0, 1000, Some("Production")).await.unwrap();
        assert_eq!(production.len(), 1);
        assert_eq!(production[0].workload_id.as_deref(), Some("svc1"));

        let env_types = fetch_env_types(&pool, &Scope::default(), 0, 1000).await.unwrap();
        assert_eq!(env_types, vec!["Production", "PreProduction", "Production"]);
    }
}
