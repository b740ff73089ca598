//! Scenario extraction from free text, typically the text of an uploaded document.
//!
//! Expected layout:
//!
//! ```text
//! Scenario name: Onboard customer
//! Description: Render the welcome mail then fill the CRM form
//! Steps:
//! 1. template: {"name": "welcome", "bindings": {"user": "Alice"}}
//! 2. web: {"url": "https://crm.example/new", "actions": []}
//! ```
//!
//! The French headers used by older documents (`Nom du scénario:`, `Étapes:`)
//! are accepted as well.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::types::{ScenarioDraft, Step, StepKind};

static STEP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<order>\d+)\s*[.)]\s*(?P<kind>[A-Za-z_\-]+)\s*:\s*(?P<details>.*)$")
        .expect("valid regex")
});

const NAME_HEADERS: [&str; 2] = ["Scenario name:", "Nom du scénario:"];
const DESCRIPTION_HEADERS: [&str; 1] = ["Description:"];
/// Name given to imported documents that carry no name header.
pub const UNNAMED_SCENARIO: &str = "Unnamed Scenario";

const STEPS_HEADERS: [&str; 2] = ["Steps:", "Étapes:"];

pub fn parse_scenario_text(text: &str) -> Result<ScenarioDraft, ParseError> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut steps = Vec::new();
    let mut in_steps = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(v) = strip_header(line, &NAME_HEADERS) {
            name = Some(v.to_string());
        } else if let Some(v) = strip_header(line, &DESCRIPTION_HEADERS) {
            description = Some(v.to_string()).filter(|d| !d.is_empty());
        } else if strip_header(line, &STEPS_HEADERS).is_some() {
            in_steps = true;
        } else if in_steps && line.starts_with(|c: char| c.is_ascii_digit()) {
            steps.push(parse_step_line(line, idx + 1)?);
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED_SCENARIO.to_string());
    Ok(ScenarioDraft {
        name,
        description,
        steps,
        tags: Vec::new(),
    })
}

fn strip_header<'a>(line: &'a str, headers: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .find_map(|h| line.strip_prefix(h))
        .map(str::trim)
}

fn parse_step_line(line: &str, line_no: usize) -> Result<Step, ParseError> {
    let caps = STEP_LINE_RE.captures(line).ok_or_else(|| ParseError::Text {
        line: line_no,
        message: "expected `<n>. <kind>: <json details>`".to_string(),
    })?;

    let order: i64 = caps["order"].parse().map_err(|_| ParseError::Text {
        line: line_no,
        message: "step number out of range".to_string(),
    })?;
    let details_src = caps["details"].trim();
    let details = if details_src.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(details_src).map_err(|e| ParseError::Text {
            line: line_no,
            message: format!("invalid step details: {e}"),
        })?
    };

    Ok(Step::new(StepKind::parse(&caps["kind"]), details, order))
}
