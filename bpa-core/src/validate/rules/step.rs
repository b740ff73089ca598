use serde_json::Value as JsonValue;

use crate::types::{Step, StepKind};
use crate::validate::validator::Validator;

pub(crate) fn validate_step(v: &mut Validator, step: &Step, path: &str) {
    let dpath = format!("{path}.details");
    let Some(details) = step.details.as_object() else {
        v.push(dpath, "must be a mapping");
        return;
    };

    // Unknown kinds are accepted here; the dispatcher reports them at run time.
    let required: &[&[&str]] = match step.kind {
        StepKind::Web => &[&["url"]],
        StepKind::Template => &[&["name", "template_name", "template"]],
        StepKind::Pdf => &[&["document", "file"]],
        StepKind::Ai => &[&["description", "prompt"]],
        StepKind::Unknown(_) => &[],
    };

    for alternatives in required {
        let present = alternatives
            .iter()
            .any(|k| matches!(details.get(*k), Some(JsonValue::String(s)) if !s.trim().is_empty()));
        if !present {
            v.push(
                format!("{dpath}.{}", alternatives[0]),
                format!("{} step requires a non-empty `{}`", step.kind, alternatives[0]),
            );
        }
    }

    if step.kind == StepKind::Web {
        if let Some(actions) = details.get("actions") {
            match actions.as_array() {
                Some(list) => {
                    for (idx, a) in list.iter().enumerate() {
                        validate_web_action(v, &format!("{dpath}.actions[{idx}]"), a);
                    }
                }
                None => v.push(format!("{dpath}.actions"), "must be a list"),
            }
        }
    }
}

fn validate_web_action(v: &mut Validator, path: &str, action: &JsonValue) {
    let kind = action.get("type").and_then(JsonValue::as_str);
    match kind {
        Some("click") | Some("submit") | Some("fill") => {}
        Some(other) => v.push(format!("{path}.type"), format!("unsupported action `{other}`")),
        None => v.push(format!("{path}.type"), "is required"),
    }
    if action.get("selector").and_then(JsonValue::as_str).is_none() {
        v.push(format!("{path}.selector"), "is required");
    }
    if kind == Some("fill") {
        match action.get("value") {
            None => v.push(format!("{path}.value"), "is required for fill actions"),
            Some(JsonValue::String(_)) => {}
            Some(_) => v.push(format!("{path}.value"), "must be a string for fill actions"),
        }
    }
}
