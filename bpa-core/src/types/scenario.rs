use crate::types::{Step, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl ScenarioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStatus::Draft => "draft",
            ScenarioStatus::Active => "active",
            ScenarioStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ScenarioStatus::Draft),
            "active" => Some(ScenarioStatus::Active),
            "archived" => Some(ScenarioStatus::Archived),
            _ => None,
        }
    }
}

/// A named, ordered automation recipe.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<Step>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub status: ScenarioStatus,

    pub created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    pub created_by: String,
}

impl Scenario {
    /// Materialize a draft into a new scenario with a fresh identifier.
    pub fn from_draft(draft: ScenarioDraft, created_by: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            steps: draft.steps,
            tags: draft.tags,
            status: ScenarioStatus::Draft,
            created_at: now,
            updated_at: None,
            created_by: created_by.into(),
        }
    }

    /// Steps sorted by their declared `order`. The stored sequence is left untouched.
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    pub fn apply(&mut self, patch: ScenarioPatch, now: Timestamp) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Some(now);
    }
}

/// Input for creating a scenario, either authored directly or parsed from a document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioDraft {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<Step>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScenarioStatus>,
}
