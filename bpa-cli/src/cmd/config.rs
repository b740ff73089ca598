use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bpa_core::types::Details;
use bpa_core::{parse_scenario_str, parse_scenario_text, DocumentFormat, ParseError, ScenarioDraft, StepKind};
use bpa_exec::agent::{AgentExecutor, AgentLoop, OpenAiChatModel, ReadDocumentTool, RenderTemplateTool, Toolset};
use bpa_exec::document::{AutoExtractor, DocumentExecutor, FsDocumentSource};
use bpa_exec::executor::{Dispatcher, ExecutorConfig, StepExecutor, StepFailure};
use bpa_exec::template::{DirTemplateBackend, TemplateExecutor, VariableTemplateBackend};
use bpa_exec::web::{WebDriverBackend, WebExecutor};
use bpa_store::{MemoryStore, PostgresStore, ScenarioStore, VariableStore};
use secrecy::SecretString;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::output::print_error;
use crate::utils::redact_url_password;
use crate::{EngineArgs, OutputArgs, StoreArgs};

/// `--store memory` selects a throwaway in-process store.
pub const MEMORY_STORE: &str = "memory";

pub fn get_database_url(store_arg: Option<String>, output: &OutputArgs) -> Option<String> {
    let url = store_arg
        .or_else(|| std::env::var("BPA_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok());
    if url.is_none() {
        print_error(
            output.format,
            output.quiet,
            "missing database URL. Set --store <url|memory>, BPA_DATABASE_URL, or DATABASE_URL environment variable",
        );
    }
    url
}

/// Both views of one backing store.
pub struct Stores {
    pub scenarios: Arc<dyn ScenarioStore>,
    pub variables: Arc<dyn VariableStore>,
}

pub async fn open_stores(store: StoreArgs, output: &OutputArgs) -> Option<Stores> {
    let url = get_database_url(store.store, output)?;
    if url == MEMORY_STORE {
        debug!("using in-memory store");
        let memory = Arc::new(MemoryStore::new());
        return Some(Stores {
            scenarios: memory.clone(),
            variables: memory,
        });
    }
    match PostgresStore::connect(&url, 10).await {
        Ok(pg) => {
            let pg = Arc::new(pg);
            Some(Stores {
                scenarios: pg.clone(),
                variables: pg,
            })
        }
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!(
                    "database connection failed to {}: {e}. Check your DATABASE_URL and ensure Postgres is running.",
                    redact_url_password(&url)
                ),
            );
            None
        }
    }
}

pub async fn open_store(store: StoreArgs, output: &OutputArgs) -> Option<Arc<dyn ScenarioStore>> {
    open_stores(store, output).await.map(|s| s.scenarios)
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Read a scenario document: `.txt` files use the `Scenario name:` / `Steps:`
/// layout, everything else is JSON or YAML.
pub fn load_draft(path: &Path) -> Result<ScenarioDraft, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt")) {
        return Ok(parse_scenario_text(&content)?);
    }
    Ok(parse_scenario_str(&content, DocumentFormat::Auto)?.draft)
}

pub fn build_executor_config(engine: &EngineArgs) -> ExecutorConfig {
    ExecutorConfig {
        step_timeout: Duration::from_secs(engine.step_timeout),
        agent_max_turns: engine.ai_max_turns,
        browser_timeout: Duration::from_secs(engine.browser_timeout),
    }
}

pub fn openai_api_key() -> Option<SecretString> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}

/// Wire every known step kind to its production backend.
///
/// Backends that cannot be configured are replaced by an executor that fails
/// each step with the configuration problem, so unrelated steps still run.
pub fn build_dispatcher(
    engine: &EngineArgs,
    config: &ExecutorConfig,
    variables: Arc<dyn VariableStore>,
) -> Dispatcher {
    let templates = Arc::new(VariableTemplateBackend::new(
        Arc::new(DirTemplateBackend::new(&engine.template_dir)),
        variables,
    ));
    let documents = Arc::new(FsDocumentSource::new(&engine.document_dir));
    let extractor = Arc::new(AutoExtractor);

    let web: Arc<dyn StepExecutor> = match webdriver_backend(engine, config) {
        Ok(backend) => Arc::new(WebExecutor::new(Arc::new(backend))),
        Err(e) => {
            warn!(error = %e, "web steps disabled");
            Arc::new(UnconfiguredExecutor::new(format!("web automation unavailable: {e}")))
        }
    };

    let ai: Arc<dyn StepExecutor> = match openai_api_key() {
        None => Arc::new(UnconfiguredExecutor::new(
            "AI steps require OPENAI_API_KEY to be set",
        )),
        Some(key) => match OpenAiChatModel::new(
            engine.ai_base_url.as_deref(),
            engine.ai_model.clone(),
            key,
            config.step_timeout,
        ) {
            Ok(model) => {
                let toolset = Toolset::new()
                    .with(Arc::new(RenderTemplateTool::new(templates.clone())))
                    .with(Arc::new(ReadDocumentTool::new(documents.clone(), extractor.clone())));
                let agent = AgentLoop::new(Arc::new(model), config.agent_max_turns);
                Arc::new(AgentExecutor::new(Arc::new(agent), toolset))
            }
            Err(e) => {
                warn!(error = %e, "AI steps disabled");
                Arc::new(UnconfiguredExecutor::new(format!("AI backend unavailable: {e}")))
            }
        },
    };

    Dispatcher::new()
        .with(StepKind::Web, web)
        .with(StepKind::Template, Arc::new(TemplateExecutor::new(templates)))
        .with(StepKind::Pdf, Arc::new(DocumentExecutor::new(documents, extractor)))
        .with(StepKind::Ai, ai)
}

/// WebDriver client for `--webdriver-url`, with `--webdriver-capabilities`
/// replacing the default headless Chrome session when given.
pub fn webdriver_backend(
    engine: &EngineArgs,
    config: &ExecutorConfig,
) -> Result<WebDriverBackend, String> {
    let url = Url::parse(&engine.webdriver_url).map_err(|e| format!("invalid WebDriver URL: {e}"))?;
    let backend = WebDriverBackend::new(url, config.browser_timeout).map_err(|e| e.to_string())?;
    match engine.webdriver_capabilities.as_deref() {
        None => Ok(backend),
        Some(raw) => {
            let capabilities: JsonValue = serde_json::from_str(raw)
                .map_err(|e| format!("invalid --webdriver-capabilities JSON: {e}"))?;
            if !capabilities.is_object() {
                return Err("--webdriver-capabilities must be a JSON object".to_string());
            }
            Ok(backend.with_capabilities(capabilities))
        }
    }
}

/// Fails every step with a fixed configuration message.
struct UnconfiguredExecutor {
    reason: String,
}

impl UnconfiguredExecutor {
    fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl StepExecutor for UnconfiguredExecutor {
    async fn execute(&self, _details: &Details) -> Result<JsonValue, StepFailure> {
        Err(StepFailure::failed(self.reason.clone()))
    }
}
