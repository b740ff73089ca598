mod text;

use serde::de::DeserializeOwned;

use crate::error::ParseError;
use crate::types::{ScenarioDraft, ScenarioPatch};

pub use text::{parse_scenario_text, UNNAMED_SCENARIO};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedScenario {
    pub draft: ScenarioDraft,
    pub format: DocumentFormat,
}

pub fn parse_scenario_str(input: &str, format: DocumentFormat) -> Result<ParsedScenario, ParseError> {
    let (draft, format) = parse_with_format::<ScenarioDraft>(input, format)?;
    Ok(ParsedScenario { draft, format })
}

pub fn parse_patch_str(input: &str, format: DocumentFormat) -> Result<ScenarioPatch, ParseError> {
    parse_with_format::<ScenarioPatch>(input, format).map(|(patch, _)| patch)
}

fn parse_with_format<T: DeserializeOwned>(
    input: &str,
    format: DocumentFormat,
) -> Result<(T, DocumentFormat), ParseError> {
    match format {
        DocumentFormat::Json => Ok((serde_json::from_str::<T>(input)?, format)),
        DocumentFormat::Yaml => Ok((serde_yaml::from_str::<T>(input)?, format)),
        DocumentFormat::Auto => parse_auto(input),
    }
}

fn parse_auto<T: DeserializeOwned>(input: &str) -> Result<(T, DocumentFormat), ParseError> {
    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<T>(input) {
            Ok(v) => Ok((v, DocumentFormat::Json)),
            Err(e) => match serde_yaml::from_str::<T>(input) {
                Ok(v) => Ok((v, DocumentFormat::Yaml)),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<T>(input) {
        Ok(v) => Ok((v, DocumentFormat::Yaml)),
        Err(e) => {
            if let Ok(v) = serde_json::from_str::<T>(input) {
                return Ok((v, DocumentFormat::Json));
            }
            Err(ParseError::Yaml(e))
        }
    }
}
