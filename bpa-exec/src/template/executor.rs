use std::sync::Arc;

use async_trait::async_trait;
use bpa_core::types::Details;
use serde_json::Value as JsonValue;

use crate::executor::{decode_details, StepExecutor, StepFailure};
use crate::template::backend::TemplateBackend;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TemplateDetails {
    #[serde(alias = "template_name", alias = "template")]
    pub name: String,
    #[serde(default, alias = "variables", alias = "context")]
    pub bindings: JsonValue,
}

pub struct TemplateExecutor {
    backend: Arc<dyn TemplateBackend>,
}

impl TemplateExecutor {
    pub fn new(backend: Arc<dyn TemplateBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl StepExecutor for TemplateExecutor {
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure> {
        let details: TemplateDetails = decode_details(details)?;
        let bindings = match details.bindings {
            JsonValue::Null => JsonValue::Object(Default::default()),
            b @ JsonValue::Object(_) => b,
            _ => {
                return Err(StepFailure::InvalidDetails(
                    "bindings must be a mapping".to_string(),
                ))
            }
        };
        let text = self
            .backend
            .render(&details.name, &bindings)
            .await
            .map_err(|e| StepFailure::failed(e.to_string()))?;
        Ok(JsonValue::String(text))
    }
}
