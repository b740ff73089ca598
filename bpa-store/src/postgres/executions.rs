use bpa_core::ExecutionResult;
use sqlx::PgPool;

use crate::store::{to_json, ExecutionRow, StoreError};

pub async fn insert_execution(pool: &PgPool, r: &ExecutionResult) -> Result<(), StoreError> {
    let results = to_json(&r.id, &r.results)?;
    let result = sqlx::query(
        r#"
INSERT INTO execution_results
  (id, scenario_id, status, results, started_at, completed_at, error)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&r.id)
    .bind(&r.scenario_id)
    .bind(r.status.as_str())
    .bind(results)
    .bind(r.started_at)
    .bind(r.completed_at)
    .bind(&r.error)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(r.id.clone()));
    }
    Ok(())
}

pub async fn get_execution(pool: &PgPool, id: &str) -> Result<Option<ExecutionResult>, StoreError> {
    let row = sqlx::query_as::<_, ExecutionRow>(
        r#"
SELECT id, scenario_id, status, results, started_at, completed_at, error
FROM execution_results WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(ExecutionResult::try_from).transpose()
}

pub async fn list_executions(
    pool: &PgPool,
    scenario_id: &str,
) -> Result<Vec<ExecutionResult>, StoreError> {
    let rows = sqlx::query_as::<_, ExecutionRow>(
        r#"
SELECT id, scenario_id, status, results, started_at, completed_at, error
FROM execution_results WHERE scenario_id = $1 ORDER BY started_at DESC
        "#,
    )
    .bind(scenario_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ExecutionResult::try_from).collect()
}
