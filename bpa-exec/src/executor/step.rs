use async_trait::async_trait;
use bpa_core::types::Details;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Business-level failure of a single step.
///
/// Executors convert every failure mode into this type; the runner records it
/// on the step result and stops the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepFailure {
    #[error("invalid step details: {0}")]
    InvalidDetails(String),
    #[error("{0}")]
    Failed(String),
}

impl StepFailure {
    pub fn failed(message: impl Into<String>) -> Self {
        StepFailure::Failed(message.into())
    }
}

/// Performs one kind of step. Implementations know nothing about scenarios.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Returns the step payload on success. The payload must not be `null`.
    async fn execute(&self, details: &Details) -> Result<JsonValue, StepFailure>;
}

/// Decode the opaque details mapping into an executor's typed view.
pub fn decode_details<T: DeserializeOwned>(details: &Details) -> Result<T, StepFailure> {
    serde_json::from_value(details.clone()).map_err(|e| StepFailure::InvalidDetails(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        #[allow(dead_code)]
        url: String,
    }

    #[test]
    fn decode_failure_is_invalid_details() {
        let err = decode_details::<Sample>(&json!({"uri": "x"})).unwrap_err();
        assert!(matches!(err, StepFailure::InvalidDetails(ref m) if m.contains("url")));
    }
}
