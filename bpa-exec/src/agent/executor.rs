use std::sync::Arc;

use async_trait::async_trait;
use bpa_core::types::Details;
use serde_json::Value as JsonValue;

use crate::agent::agent_loop::ReasoningBackend;
use crate::agent::tools::Toolset;
use crate::executor::{decode_details, StepExecutor, StepFailure};

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct AgentDetails {
    #[serde(alias = "prompt")]
    pub description: String,
}

pub struct AgentExecutor {
    backend: Arc<dyn ReasoningBackend>,
    toolset: Toolset,
}

impl AgentExecutor {
    pub fn new(backend: Arc<dyn ReasoningBackend>, toolset: Toolset) -> Self {
        Self { backend, toolset }
    }
}

#[async_trait]
impl StepExecutor for AgentExecutor {
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure> {
        let details: AgentDetails = decode_details(details)?;
        if details.description.trim().is_empty() {
            return Err(StepFailure::InvalidDetails("description is empty".to_string()));
        }
        let answer = self
            .backend
            .run(&details.description, &self.toolset)
            .await
            .map_err(|e| StepFailure::failed(e.to_string()))?;
        Ok(JsonValue::String(answer))
    }
}
