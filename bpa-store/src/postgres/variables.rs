use bpa_core::Variable;
use sqlx::PgPool;

use crate::store::{StoreError, VariableRow};

const VARIABLE_COLUMNS: &str = "name, value, description, created_at, updated_at";

pub async fn insert_variable(pool: &PgPool, v: &Variable) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
INSERT INTO variables (name, value, description, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(&v.name)
    .bind(&v.value)
    .bind(&v.description)
    .bind(v.created_at)
    .bind(v.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(v.name.clone()));
    }
    Ok(())
}

pub async fn get_variable(pool: &PgPool, name: &str) -> Result<Option<Variable>, StoreError> {
    let row = sqlx::query_as::<_, VariableRow>(&format!(
        "SELECT {VARIABLE_COLUMNS} FROM variables WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Variable::from))
}

pub async fn list_variables(pool: &PgPool) -> Result<Vec<Variable>, StoreError> {
    let rows = sqlx::query_as::<_, VariableRow>(&format!(
        "SELECT {VARIABLE_COLUMNS} FROM variables ORDER BY created_at DESC, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Variable::from).collect())
}

pub async fn update_variable(pool: &PgPool, v: &Variable) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
UPDATE variables
SET value = $2, description = $3, updated_at = $4
WHERE name = $1
        "#,
    )
    .bind(&v.name)
    .bind(&v.value)
    .bind(&v.description)
    .bind(v.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(v.name.clone()));
    }
    Ok(())
}

pub async fn delete_variable(pool: &PgPool, name: &str) -> Result<bool, StoreError> {
    let result = sqlx::query(r#"DELETE FROM variables WHERE name = $1"#)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
