use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Details;

/// The kind of work a step performs.
///
/// The set is closed at compile time. Anything else arriving from a scenario
/// document decodes into [`StepKind::Unknown`] instead of failing the whole
/// document, so a deployment can report it as an unsupported step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    Web,
    Template,
    Pdf,
    Ai,
    Unknown(String),
}

impl StepKind {
    pub fn as_str(&self) -> &str {
        match self {
            StepKind::Web => "web",
            StepKind::Template => "template",
            StepKind::Pdf => "pdf",
            StepKind::Ai => "ai",
            StepKind::Unknown(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => StepKind::Web,
            "template" => StepKind::Template,
            "pdf" => StepKind::Pdf,
            "ai" => StepKind::Ai,
            _ => StepKind::Unknown(s.trim().to_string()),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StepKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StepKind::parse(&s))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// Also accepted as `type`, the field name older scenario documents use.
    #[serde(alias = "type")]
    pub kind: StepKind,

    #[serde(default = "empty_details")]
    pub details: Details,

    /// Explicit sequencing value; steps run in ascending `order`.
    pub order: i64,
}

impl Step {
    pub fn new(kind: StepKind, details: Details, order: i64) -> Self {
        Self {
            kind,
            details,
            order,
        }
    }
}

fn empty_details() -> Details {
    Details::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_round_trips_its_name() {
        let kind: StepKind = serde_json::from_str("\"email\"").unwrap();
        assert_eq!(kind, StepKind::Unknown("email".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"email\"");
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(StepKind::parse("PDF"), StepKind::Pdf);
        assert_eq!(StepKind::parse(" Web "), StepKind::Web);
    }

    #[test]
    fn step_accepts_type_alias() {
        let step: Step =
            serde_json::from_str(r#"{"type":"ai","details":{"description":"x"},"order":1}"#)
                .unwrap();
        assert_eq!(step.kind, StepKind::Ai);
    }
}
