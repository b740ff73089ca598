use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::web::backend::{BrowserBackend, BrowserError, BrowserSession};

/// W3C element reference key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// WebDriver key code for Enter; submitting presses it on the target element.
const ENTER_KEY: &str = "\u{E007}";

/// Browser backend speaking the W3C WebDriver protocol (chromedriver,
/// geckodriver, Selenium) over HTTP.
pub struct WebDriverBackend {
    client: reqwest::Client,
    base: Url,
    capabilities: JsonValue,
}

impl WebDriverBackend {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, BrowserError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bpa-exec/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BrowserError::Other(format!("failed to create http client: {e}")))?;
        Ok(Self {
            client,
            base,
            capabilities: json!({
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": ["--headless=new", "--no-sandbox"] }
                }
            }),
        })
    }

    /// Query `GET /status`; returns the driver's readiness message.
    pub async fn status(&self) -> Result<String, BrowserError> {
        let url = join(&self.base, "status").map_err(BrowserError::Other)?;
        let value = send(self.client.get(url))
            .await
            .map_err(|e| BrowserError::Other(e.to_string()))?;
        let ready = value.get("ready").and_then(JsonValue::as_bool).unwrap_or(false);
        let message = value
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        if ready {
            Ok(message)
        } else {
            Err(BrowserError::Other(format!("driver not ready: {message}")))
        }
    }

    /// Replace the default headless-Chrome capabilities.
    pub fn with_capabilities(mut self, capabilities: JsonValue) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[async_trait]
impl BrowserBackend for WebDriverBackend {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let url = join(&self.base, "session").map_err(BrowserError::Open)?;
        let value = send(
            self.client.post(url).json(&json!({ "capabilities": self.capabilities })),
        )
        .await
        .map_err(|e| BrowserError::Open(e.to_string()))?;

        let session_id = value
            .get("sessionId")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| BrowserError::Open("response carried no sessionId".to_string()))?;

        let base = join(&self.base, &format!("session/{session_id}/")).map_err(BrowserError::Open)?;
        Ok(Box::new(WebDriverSession {
            client: self.client.clone(),
            base,
            closed: false,
        }))
    }
}

struct WebDriverSession {
    client: reqwest::Client,
    /// `<driver>/session/<id>/`
    base: Url,
    closed: bool,
}

impl WebDriverSession {
    fn endpoint(&self, path: &str) -> Result<Url, BrowserError> {
        if self.closed {
            return Err(BrowserError::Closed);
        }
        join(&self.base, path).map_err(BrowserError::Other)
    }

    async fn find(&self, selector: &str) -> Result<String, BrowserError> {
        let url = self.endpoint("element")?;
        let value = send(
            self.client
                .post(url)
                .json(&json!({ "using": "css selector", "value": selector })),
        )
        .await
        .map_err(|e| match e {
            DriverError::NoSuchElement => BrowserError::SelectorNotFound(selector.to_string()),
            other => action_error(selector, other),
        })?;

        value
            .get(ELEMENT_KEY)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Action {
                selector: selector.to_string(),
                message: "malformed element reference".to_string(),
            })
    }

    async fn element_call(
        &self,
        selector: &str,
        element: &str,
        action: &str,
        body: JsonValue,
    ) -> Result<(), BrowserError> {
        let url = self.endpoint(&format!("element/{element}/{action}"))?;
        send(self.client.post(url).json(&body))
            .await
            .map(|_| ())
            .map_err(|e| action_error(selector, e))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let endpoint = self.endpoint("url")?;
        send(self.client.post(endpoint).json(&json!({ "url": url })))
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Navigate {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.element_call(selector, &element, "click", json!({})).await
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.element_call(selector, &element, "clear", json!({})).await?;
        self.element_call(selector, &element, "value", json!({ "text": value }))
            .await
    }

    async fn submit(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.element_call(selector, &element, "value", json!({ "text": ENTER_KEY }))
            .await
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        // The session path itself, without the trailing slash.
        let mut url = self.base.clone();
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
        self.closed = true;
        send(self.client.delete(url))
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Other(format!("failed to delete session: {e}")))
    }
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("no such element")]
    NoSuchElement,
    #[error("timeout")]
    Timeout,
    #[error("{error}: {message}")]
    Protocol { error: String, message: String },
    #[error("{0}")]
    Transport(String),
}

fn action_error(selector: &str, e: DriverError) -> BrowserError {
    match e {
        DriverError::Timeout => BrowserError::Timeout,
        other => BrowserError::Action {
            selector: selector.to_string(),
            message: other.to_string(),
        },
    }
}

/// Send a command and unwrap the `value` member of the response.
async fn send(rb: reqwest::RequestBuilder) -> Result<JsonValue, DriverError> {
    let resp = rb.send().await.map_err(|e| {
        if e.is_timeout() {
            DriverError::Timeout
        } else {
            DriverError::Transport(e.to_string())
        }
    })?;
    let status = resp.status();
    let body: JsonValue = resp
        .json()
        .await
        .map_err(|e| DriverError::Transport(format!("invalid response body: {e}")))?;
    let value = body.get("value").cloned().unwrap_or(JsonValue::Null);

    if status.is_success() {
        return Ok(value);
    }

    let error = value
        .get("error")
        .and_then(JsonValue::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = value
        .get("message")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    Err(match error.as_str() {
        "no such element" => DriverError::NoSuchElement,
        "timeout" | "script timeout" => DriverError::Timeout,
        _ => DriverError::Protocol { error, message },
    })
}

fn join(base: &Url, path: &str) -> Result<Url, String> {
    // `Url::join` replaces the last segment unless the base ends with a slash.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path).map_err(|e| format!("invalid webdriver url: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_driver_prefix() {
        let base = Url::parse("http://localhost:4444/wd/hub").unwrap();
        assert_eq!(
            join(&base, "session").unwrap().as_str(),
            "http://localhost:4444/wd/hub/session"
        );
        let session = join(&base, "session/abc/").unwrap();
        assert_eq!(
            join(&session, "element").unwrap().as_str(),
            "http://localhost:4444/wd/hub/session/abc/element"
        );
    }
}
