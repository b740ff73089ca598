use bpa_core::{
    ExecutionResult, ExecutionStatus, Scenario, ScenarioStatus, Step, StepResult, Variable,
};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::store::StoreError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScenarioRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub steps: JsonValue,
    pub tags: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl TryFrom<ScenarioRow> for Scenario {
    type Error = StoreError;

    fn try_from(row: ScenarioRow) -> Result<Self, Self::Error> {
        let steps: Vec<Step> = serde_json::from_value(row.steps).map_err(|e| StoreError::Corrupt {
            id: row.id.clone(),
            message: format!("steps: {e}"),
        })?;
        let status = ScenarioStatus::parse(&row.status).ok_or_else(|| StoreError::Corrupt {
            id: row.id.clone(),
            message: format!("unknown scenario status `{}`", row.status),
        })?;
        Ok(Scenario {
            id: row.id,
            name: row.name,
            description: row.description,
            steps,
            tags: row.tags,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExecutionRow {
    pub id: String,
    pub scenario_id: String,
    pub status: String,
    pub results: JsonValue,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl TryFrom<ExecutionRow> for ExecutionResult {
    type Error = StoreError;

    fn try_from(row: ExecutionRow) -> Result<Self, Self::Error> {
        let results: Vec<StepResult> =
            serde_json::from_value(row.results).map_err(|e| StoreError::Corrupt {
                id: row.id.clone(),
                message: format!("results: {e}"),
            })?;
        let status = ExecutionStatus::parse(&row.status).ok_or_else(|| StoreError::Corrupt {
            id: row.id.clone(),
            message: format!("unknown execution status `{}`", row.status),
        })?;
        Ok(ExecutionResult {
            id: row.id,
            scenario_id: row.scenario_id,
            status,
            results,
            started_at: row.started_at,
            completed_at: row.completed_at,
            error: row.error,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariableRow {
    pub name: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VariableRow> for Variable {
    fn from(row: VariableRow) -> Self {
        Variable {
            name: row.name,
            value: row.value,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(id: &str, value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        message: e.to_string(),
    })
}
