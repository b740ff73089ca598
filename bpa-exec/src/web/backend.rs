use async_trait::async_trait;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("failed to open browser session: {0}")]
    Open(String),
    #[error("navigation to {url} failed: {message}")]
    Navigate { url: String, message: String },
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("action on `{selector}` failed: {message}")]
    Action { selector: String, message: String },
    #[error("browser session already closed")]
    Closed,
    #[error("browser timeout")]
    Timeout,
    #[error("browser error: {0}")]
    Other(String),
}

#[async_trait]
pub trait BrowserBackend: Send + Sync {
    /// Open a fresh session. Sessions are never shared between steps.
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;
    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;
    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;
    async fn submit(&mut self, selector: &str) -> Result<(), BrowserError>;
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Owns a browser session for the duration of one web step.
///
/// [`SessionGuard::close`] releases the session explicitly. If the guard is
/// dropped without it (the step future was aborted, or panicked), the close is
/// scheduled on the current runtime instead.
pub struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self { session: Some(session) }
    }

    pub fn session(&mut self) -> Result<&mut (dyn BrowserSession + 'static), BrowserError> {
        self.session.as_deref_mut().ok_or(BrowserError::Closed)
    }

    pub async fn close(mut self) -> Result<(), BrowserError> {
        match self.session.take() {
            Some(mut session) => session.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!(error = %e, "failed to close abandoned browser session");
                    }
                });
            }
            Err(_) => warn!("browser session dropped outside a runtime; it was not closed"),
        }
    }
}
