use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateRenderError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("invalid template name `{0}`")]
    InvalidName(String),
    #[error("template `{name}`: {message}")]
    Render { name: String, message: String },
    #[error("failed to read template `{name}`: {message}")]
    Io { name: String, message: String },
    #[error("failed to load variables: {0}")]
    Variables(String),
}

#[async_trait]
pub trait TemplateBackend: Send + Sync {
    async fn render(&self, name: &str, bindings: &JsonValue) -> Result<String, TemplateRenderError>;
}

/// Renders one Jinja source. Undefined names are errors and every value is
/// HTML-escaped unless marked `|safe`.
pub(crate) fn render_source(
    name: &str,
    source: &str,
    bindings: &JsonValue,
) -> Result<String, TemplateRenderError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.render_named_str(name, source, bindings)
        .map_err(|e| TemplateRenderError::Render {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// Templates stored as files under one directory.
///
/// `welcome` resolves to the first existing of `welcome`, `welcome.tmpl`,
/// `welcome.txt`, `welcome.html`.
pub struct DirTemplateBackend {
    root: PathBuf,
}

const EXTENSIONS: [&str; 3] = ["tmpl", "txt", "html"];

impl DirTemplateBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn resolve(&self, name: &str) -> Result<PathBuf, TemplateRenderError> {
        let relative = Path::new(name);
        let is_plain = !name.is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(TemplateRenderError::InvalidName(name.to_string()));
        }

        let exact = self.root.join(relative);
        let candidates = std::iter::once(exact.clone())
            .chain(EXTENSIONS.iter().map(|ext| self.root.join(format!("{name}.{ext}"))));
        for candidate in candidates {
            if tokio::fs::metadata(&candidate).await.map(|m| m.is_file()).unwrap_or(false) {
                return Ok(candidate);
            }
        }
        Err(TemplateRenderError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl TemplateBackend for DirTemplateBackend {
    async fn render(&self, name: &str, bindings: &JsonValue) -> Result<String, TemplateRenderError> {
        let path = self.resolve(name).await?;
        let source = tokio::fs::read_to_string(&path).await.map_err(|e| TemplateRenderError::Io {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        render_source(name, &source, bindings)
    }
}

/// Named template sources held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateBackend {
    templates: HashMap<String, String>,
}

impl MemoryTemplateBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }
}

#[async_trait]
impl TemplateBackend for MemoryTemplateBackend {
    async fn render(&self, name: &str, bindings: &JsonValue) -> Result<String, TemplateRenderError> {
        let source = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateRenderError::NotFound(name.to_string()))?;
        render_source(name, source, bindings)
    }
}
