use bpa_core::{ExecutionResult, Scenario, Variable};
use sqlx::PgPool;

use crate::store::{ScenarioStore, StoreError, VariableStore};

use super::executions;
use super::scenarios;
use super::variables;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ScenarioStore for PostgresStore {
    async fn create_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        scenarios::insert_scenario(&self.pool, scenario).await
    }

    async fn get_scenario(&self, id: &str) -> Result<Option<Scenario>, StoreError> {
        scenarios::get_scenario(&self.pool, id).await
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StoreError> {
        scenarios::list_scenarios(&self.pool).await
    }

    async fn update_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        scenarios::update_scenario(&self.pool, scenario).await
    }

    async fn delete_scenario(&self, id: &str) -> Result<bool, StoreError> {
        scenarios::delete_scenario(&self.pool, id).await
    }

    async fn save_execution(&self, result: &ExecutionResult) -> Result<(), StoreError> {
        executions::insert_execution(&self.pool, result).await
    }

    async fn get_execution(&self, id: &str) -> Result<Option<ExecutionResult>, StoreError> {
        executions::get_execution(&self.pool, id).await
    }

    async fn list_executions(&self, scenario_id: &str) -> Result<Vec<ExecutionResult>, StoreError> {
        executions::list_executions(&self.pool, scenario_id).await
    }
}

#[async_trait::async_trait]
impl VariableStore for PostgresStore {
    async fn create_variable(&self, variable: &Variable) -> Result<(), StoreError> {
        variables::insert_variable(&self.pool, variable).await
    }

    async fn get_variable(&self, name: &str) -> Result<Option<Variable>, StoreError> {
        variables::get_variable(&self.pool, name).await
    }

    async fn list_variables(&self) -> Result<Vec<Variable>, StoreError> {
        variables::list_variables(&self.pool).await
    }

    async fn update_variable(&self, variable: &Variable) -> Result<(), StoreError> {
        variables::update_variable(&self.pool, variable).await
    }

    async fn delete_variable(&self, name: &str) -> Result<bool, StoreError> {
        variables::delete_variable(&self.pool, name).await
    }
}
