use crate::types::Timestamp;

/// A named value shared by all scenarios. Template steps see every variable
/// as a default binding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variable {
    pub name: String,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        description: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: VariablePatch, now: Timestamp) {
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.updated_at = now;
    }
}

/// Partial update of a variable; the name is its identity and never changes.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariablePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
