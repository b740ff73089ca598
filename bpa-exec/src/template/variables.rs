use std::sync::Arc;

use async_trait::async_trait;
use bpa_store::VariableStore;
use serde_json::{Map, Value as JsonValue};

use super::backend::{TemplateBackend, TemplateRenderError};

/// Exposes every stored variable to the wrapped backend as a default binding.
/// A step binding with the same name wins.
pub struct VariableTemplateBackend {
    inner: Arc<dyn TemplateBackend>,
    variables: Arc<dyn VariableStore>,
}

impl VariableTemplateBackend {
    pub fn new(inner: Arc<dyn TemplateBackend>, variables: Arc<dyn VariableStore>) -> Self {
        Self { inner, variables }
    }
}

#[async_trait]
impl TemplateBackend for VariableTemplateBackend {
    async fn render(&self, name: &str, bindings: &JsonValue) -> Result<String, TemplateRenderError> {
        let stored = self
            .variables
            .list_variables()
            .await
            .map_err(|e| TemplateRenderError::Variables(e.to_string()))?;

        let mut merged: Map<String, JsonValue> = stored
            .into_iter()
            .map(|v| (v.name, JsonValue::String(v.value)))
            .collect();
        if let JsonValue::Object(step) = bindings {
            merged.extend(step.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self.inner.render(name, &JsonValue::Object(merged)).await
    }
}
