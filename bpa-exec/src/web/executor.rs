use std::sync::Arc;

use async_trait::async_trait;
use bpa_core::types::Details;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::executor::{decode_details, StepExecutor, StepFailure};
use crate::web::backend::{BrowserBackend, BrowserError, BrowserSession, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct WebDetails {
    pub url: String,
    #[serde(default)]
    pub actions: Vec<WebAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebAction {
    Click { selector: String },
    Fill { selector: String, value: String },
    Submit { selector: String },
}

impl WebAction {
    async fn perform(&self, session: &mut dyn BrowserSession) -> Result<(), BrowserError> {
        match self {
            WebAction::Click { selector } => session.click(selector).await,
            WebAction::Fill { selector, value } => session.fill(selector, value).await,
            WebAction::Submit { selector } => session.submit(selector).await,
        }
    }
}

pub struct WebExecutor {
    backend: Arc<dyn BrowserBackend>,
}

impl WebExecutor {
    pub fn new(backend: Arc<dyn BrowserBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl StepExecutor for WebExecutor {
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure> {
        let details: WebDetails = decode_details(details)?;
        check_url(&details.url)?;

        let session = self
            .backend
            .open()
            .await
            .map_err(|e| StepFailure::failed(e.to_string()))?;
        let mut guard = SessionGuard::new(session);

        let outcome = drive(&mut guard, &details).await;
        let closed = guard.close().await;

        match (outcome, closed) {
            (Err(e), _) => Err(StepFailure::failed(e.to_string())),
            (Ok(performed), close) => {
                if let Err(e) = close {
                    warn!(url = %details.url, error = %e, "failed to close browser session");
                }
                Ok(json!({ "url": details.url, "actions_performed": performed }))
            }
        }
    }
}

/// Navigate then perform the actions in order; the first failure stops the step.
async fn drive(guard: &mut SessionGuard, details: &WebDetails) -> Result<usize, BrowserError> {
    let session = guard.session()?;
    session.navigate(&details.url).await?;
    for (idx, action) in details.actions.iter().enumerate() {
        debug!(url = %details.url, action = idx, "performing web action");
        action.perform(session).await?;
    }
    Ok(details.actions.len())
}

fn check_url(raw: &str) -> Result<(), StepFailure> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| StepFailure::InvalidDetails(format!("url `{raw}`: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(StepFailure::InvalidDetails(format!(
            "url `{raw}`: unsupported scheme `{other}`"
        ))),
    }
}
