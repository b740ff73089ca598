use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::agent::model::ToolSpec;
use crate::document::{DocumentBackend, DocumentSource};
use crate::template::TemplateBackend;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;
    async fn call(&self, arguments: &JsonValue) -> Result<String, ToolError>;
}

/// The fixed set of tools an agent may use, keyed by name.
#[derive(Clone, Default)]
pub struct Toolset {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Toolset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.spec().name, tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}

fn required_str<'a>(arguments: &'a JsonValue, key: &str) -> Result<&'a str, ToolError> {
    arguments
        .get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ToolError::InvalidArguments(format!("`{key}` must be a string")))
}

pub struct RenderTemplateTool {
    backend: Arc<dyn TemplateBackend>,
}

impl RenderTemplateTool {
    pub fn new(backend: Arc<dyn TemplateBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for RenderTemplateTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "render_template".to_string(),
            description: "Render a named business template with variable bindings.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "bindings": { "type": "object" }
                },
                "required": ["name"]
            }),
        }
    }

    async fn call(&self, arguments: &JsonValue) -> Result<String, ToolError> {
        let name = required_str(arguments, "name")?;
        let bindings = arguments.get("bindings").cloned().unwrap_or_else(|| json!({}));
        self.backend
            .render(name, &bindings)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))
    }
}

pub struct ReadDocumentTool {
    source: Arc<dyn DocumentSource>,
    backend: Arc<dyn DocumentBackend>,
}

impl ReadDocumentTool {
    pub fn new(source: Arc<dyn DocumentSource>, backend: Arc<dyn DocumentBackend>) -> Self {
        Self { source, backend }
    }
}

#[async_trait]
impl Tool for ReadDocumentTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read_document".to_string(),
            description: "Return the text content of a stored document.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": { "document": { "type": "string" } },
                "required": ["document"]
            }),
        }
    }

    async fn call(&self, arguments: &JsonValue) -> Result<String, ToolError> {
        let reference = required_str(arguments, "document")?;
        let bytes = self
            .source
            .load(reference)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;
        self.backend
            .extract_text(&bytes)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))
    }
}
