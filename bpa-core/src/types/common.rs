use chrono::{DateTime, Utc};

/// Kind-specific step payload. Each executor decodes it into its own typed shape.
pub type Details = serde_json::Value;

pub type Timestamp = DateTime<Utc>;
