use std::sync::Arc;

use async_trait::async_trait;
use bpa_core::types::Details;
use serde_json::Value as JsonValue;

use crate::document::extract::DocumentBackend;
use crate::document::source::DocumentSource;
use crate::executor::{decode_details, StepExecutor, StepFailure};

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct DocumentDetails {
    #[serde(alias = "file")]
    pub document: String,
}

pub struct DocumentExecutor {
    source: Arc<dyn DocumentSource>,
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentExecutor {
    pub fn new(source: Arc<dyn DocumentSource>, backend: Arc<dyn DocumentBackend>) -> Self {
        Self { source, backend }
    }
}

#[async_trait]
impl StepExecutor for DocumentExecutor {
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure> {
        let details: DocumentDetails = decode_details(details)?;
        let bytes = self
            .source
            .load(&details.document)
            .await
            .map_err(|e| StepFailure::failed(e.to_string()))?;
        let text = self
            .backend
            .extract_text(&bytes)
            .await
            .map_err(|e| StepFailure::failed(format!("{}: {e}", details.document)))?;
        Ok(JsonValue::String(text))
    }
}
