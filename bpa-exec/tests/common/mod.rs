#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bpa_core::types::Details;
use bpa_core::{Scenario, ScenarioDraft, Step};
use bpa_exec::executor::{StepExecutor, StepFailure};
use bpa_exec::web::{BrowserBackend, BrowserError, BrowserSession};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};

pub fn scenario(steps: Vec<Step>) -> Scenario {
    Scenario::from_draft(
        ScenarioDraft {
            name: "test scenario".to_string(),
            description: None,
            steps,
            tags: vec![],
        },
        "tester",
        Utc::now(),
    )
}

/// Succeeds with `{"echo": details}` unless details carry `"fail": true`.
/// Every call is recorded.
#[derive(Default)]
pub struct ScriptedExecutor {
    pub calls: Arc<Mutex<Vec<JsonValue>>>,
}

impl ScriptedExecutor {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StepExecutor for ScriptedExecutor {
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure> {
        self.calls.lock().unwrap().push(details.clone());
        if details.get("fail").and_then(JsonValue::as_bool).unwrap_or(false) {
            return Err(StepFailure::failed("scripted failure"));
        }
        Ok(json!({ "echo": details }))
    }
}

pub struct PanickingExecutor;

#[async_trait]
impl StepExecutor for PanickingExecutor {
    async fn execute(&self, _details: &Details) -> Result<JsonValue, StepFailure> {
        panic!("executor bug");
    }
}

#[derive(Debug, Default)]
pub struct BrowserLog {
    pub opened: usize,
    pub closed: usize,
    pub calls: Vec<String>,
    pub filled: Vec<String>,
}

/// In-memory browser. `fail_on` makes the matching call (e.g. `"fill #name"`)
/// fail with the given error; `hang_on_navigate` makes navigation never finish.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    pub log: Arc<Mutex<BrowserLog>>,
    pub fail_on: Option<(String, BrowserError)>,
    pub hang_on_navigate: bool,
}

impl FakeBrowser {
    pub fn failing(call: &str, error: BrowserError) -> Self {
        Self {
            fail_on: Some((call.to_string(), error)),
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang_on_navigate: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> (usize, usize, Vec<String>) {
        let log = self.log.lock().unwrap();
        (log.opened, log.closed, log.calls.clone())
    }
}

#[async_trait]
impl BrowserBackend for FakeBrowser {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.log.lock().unwrap().opened += 1;
        Ok(Box::new(FakeSession { browser: self.clone() }))
    }
}

struct FakeSession {
    browser: FakeBrowser,
}

impl FakeSession {
    fn record(&self, call: String) -> Result<(), BrowserError> {
        self.browser.log.lock().unwrap().calls.push(call.clone());
        match &self.browser.fail_on {
            Some((target, err)) if *target == call => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        if self.browser.hang_on_navigate {
            std::future::pending::<()>().await;
        }
        self.record(format!("navigate {url}"))
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.record(format!("click {selector}"))
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.browser.log.lock().unwrap().filled.push(value.to_string());
        self.record(format!("fill {selector}"))
    }

    async fn submit(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.record(format!("submit {selector}"))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.browser.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// A one-page PDF whose text layer is `text` in Helvetica.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", idx + 1).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}
