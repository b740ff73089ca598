use async_trait::async_trait;
use bpa_core::{ExecutionResult, Scenario, Variable};

/// Durable lookup and save of scenarios and execution records.
///
/// No transactional isolation is assumed across concurrent runs; two runs of the
/// same scenario simply produce two independent execution records.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    async fn create_scenario(&self, scenario: &Scenario) -> Result<(), StoreError>;

    async fn get_scenario(&self, id: &str) -> Result<Option<Scenario>, StoreError>;

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StoreError>;

    /// Replace an existing scenario. Fails with [`StoreError::NotFound`] if it does not exist.
    async fn update_scenario(&self, scenario: &Scenario) -> Result<(), StoreError>;

    async fn delete_scenario(&self, id: &str) -> Result<bool, StoreError>;

    /// Persist a finalized execution record. Records are write-once: saving an
    /// identifier that already exists fails with [`StoreError::Conflict`].
    async fn save_execution(&self, result: &ExecutionResult) -> Result<(), StoreError>;

    async fn get_execution(&self, id: &str) -> Result<Option<ExecutionResult>, StoreError>;

    /// Executions of one scenario, most recent first.
    async fn list_executions(&self, scenario_id: &str) -> Result<Vec<ExecutionResult>, StoreError>;
}

/// Named values shared by every scenario, keyed by name.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the name is taken.
    async fn create_variable(&self, variable: &Variable) -> Result<(), StoreError>;

    async fn get_variable(&self, name: &str) -> Result<Option<Variable>, StoreError>;

    /// Newest first.
    async fn list_variables(&self) -> Result<Vec<Variable>, StoreError>;

    async fn update_variable(&self, variable: &Variable) -> Result<(), StoreError>;

    async fn delete_variable(&self, name: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("corrupt record {id}: {message}")]
    Corrupt { id: String, message: String },
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}
