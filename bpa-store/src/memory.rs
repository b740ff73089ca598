//! Process-local store, used by tests and by the CLI when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use bpa_core::{ExecutionResult, Scenario, Variable};
use tokio::sync::RwLock;

use crate::store::{ScenarioStore, StoreError, VariableStore};

#[derive(Default)]
pub struct MemoryStore {
    scenarios: RwLock<HashMap<String, Scenario>>,
    executions: RwLock<HashMap<String, ExecutionResult>>,
    variables: RwLock<HashMap<String, Variable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given scenarios.
    pub fn with_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let map = scenarios.into_iter().map(|s| (s.id.clone(), s)).collect();
        Self {
            scenarios: RwLock::new(map),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ScenarioStore for MemoryStore {
    async fn create_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        let mut guard = self.scenarios.write().await;
        if guard.contains_key(&scenario.id) {
            return Err(StoreError::Conflict(scenario.id.clone()));
        }
        guard.insert(scenario.id.clone(), scenario.clone());
        Ok(())
    }

    async fn get_scenario(&self, id: &str) -> Result<Option<Scenario>, StoreError> {
        Ok(self.scenarios.read().await.get(id).cloned())
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StoreError> {
        let mut out: Vec<Scenario> = self.scenarios.read().await.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn update_scenario(&self, scenario: &Scenario) -> Result<(), StoreError> {
        let mut guard = self.scenarios.write().await;
        match guard.get_mut(&scenario.id) {
            Some(slot) => {
                *slot = scenario.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(scenario.id.clone())),
        }
    }

    async fn delete_scenario(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.scenarios.write().await.remove(id).is_some())
    }

    async fn save_execution(&self, result: &ExecutionResult) -> Result<(), StoreError> {
        let mut guard = self.executions.write().await;
        if guard.contains_key(&result.id) {
            return Err(StoreError::Conflict(result.id.clone()));
        }
        guard.insert(result.id.clone(), result.clone());
        Ok(())
    }

    async fn get_execution(&self, id: &str) -> Result<Option<ExecutionResult>, StoreError> {
        Ok(self.executions.read().await.get(id).cloned())
    }

    async fn list_executions(&self, scenario_id: &str) -> Result<Vec<ExecutionResult>, StoreError> {
        let mut out: Vec<ExecutionResult> = self
            .executions
            .read()
            .await
            .values()
            .filter(|r| r.scenario_id == scenario_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.started_at.cmp(&a.started_at).then_with(|| b.id.cmp(&a.id)));
        Ok(out)
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn create_variable(&self, variable: &Variable) -> Result<(), StoreError> {
        let mut guard = self.variables.write().await;
        if guard.contains_key(&variable.name) {
            return Err(StoreError::Conflict(variable.name.clone()));
        }
        guard.insert(variable.name.clone(), variable.clone());
        Ok(())
    }

    async fn get_variable(&self, name: &str) -> Result<Option<Variable>, StoreError> {
        Ok(self.variables.read().await.get(name).cloned())
    }

    async fn list_variables(&self) -> Result<Vec<Variable>, StoreError> {
        let mut out: Vec<Variable> = self.variables.read().await.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn update_variable(&self, variable: &Variable) -> Result<(), StoreError> {
        match self.variables.write().await.get_mut(&variable.name) {
            Some(slot) => {
                *slot = variable.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(variable.name.clone())),
        }
    }

    async fn delete_variable(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.variables.write().await.remove(name).is_some())
    }
}
