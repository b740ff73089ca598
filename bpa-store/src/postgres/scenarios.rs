use bpa_core::Scenario;
use sqlx::PgPool;

use crate::store::{to_json, ScenarioRow, StoreError};

const SCENARIO_COLUMNS: &str =
    "id, name, description, steps, tags, status, created_at, updated_at, created_by";

pub async fn insert_scenario(pool: &PgPool, s: &Scenario) -> Result<(), StoreError> {
    let steps = to_json(&s.id, &s.steps)?;
    let result = sqlx::query(
        r#"
INSERT INTO scenarios
  (id, name, description, steps, tags, status, created_at, updated_at, created_by)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&s.id)
    .bind(&s.name)
    .bind(&s.description)
    .bind(steps)
    .bind(&s.tags)
    .bind(s.status.as_str())
    .bind(s.created_at)
    .bind(s.updated_at)
    .bind(&s.created_by)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(s.id.clone()));
    }
    Ok(())
}

pub async fn get_scenario(pool: &PgPool, id: &str) -> Result<Option<Scenario>, StoreError> {
    let row = sqlx::query_as::<_, ScenarioRow>(&format!(
        "SELECT {SCENARIO_COLUMNS} FROM scenarios WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Scenario::try_from).transpose()
}

pub async fn list_scenarios(pool: &PgPool) -> Result<Vec<Scenario>, StoreError> {
    let rows = sqlx::query_as::<_, ScenarioRow>(&format!(
        "SELECT {SCENARIO_COLUMNS} FROM scenarios ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Scenario::try_from).collect()
}

pub async fn update_scenario(pool: &PgPool, s: &Scenario) -> Result<(), StoreError> {
    let steps = to_json(&s.id, &s.steps)?;
    let result = sqlx::query(
        r#"
UPDATE scenarios
SET name = $2, description = $3, steps = $4, tags = $5, status = $6, updated_at = $7
WHERE id = $1
        "#,
    )
    .bind(&s.id)
    .bind(&s.name)
    .bind(&s.description)
    .bind(steps)
    .bind(&s.tags)
    .bind(s.status.as_str())
    .bind(s.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(s.id.clone()));
    }
    Ok(())
}

pub async fn delete_scenario(pool: &PgPool, id: &str) -> Result<bool, StoreError> {
    let result = sqlx::query(r#"DELETE FROM scenarios WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
