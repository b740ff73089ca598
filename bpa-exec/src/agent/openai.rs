use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::agent::model::{ChatMessage, LanguageModel, ModelError, ModelReply, Role, ToolCall, ToolSpec};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// OpenAI-compatible chat-completions client with function calling.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: SecretString,
}

impl std::fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiChatModel {
    pub fn new(
        base_url: Option<&str>,
        model: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let mut base = Url::parse(base_url.unwrap_or(DEFAULT_BASE_URL))
            .map_err(|e| ModelError::Transport(format!("invalid base url: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("chat/completions")
            .map_err(|e| ModelError::Transport(format!("invalid base url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bpa-exec/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key,
        })
    }

    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> JsonValue {
        let mut body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages.iter().map(message_to_wire).collect::<Vec<_>>(),
        });
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
        }
        body
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelReply, ModelError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(messages, tools))
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = resp.status();
        let body: JsonValue = resp
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;
        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(JsonValue::as_str)
                .unwrap_or("no error message")
                .to_string();
            return Err(ModelError::Api { status: status.as_u16(), message });
        }
        parse_reply(&body)
    }
}

fn message_to_wire(m: &ChatMessage) -> JsonValue {
    let mut out = json!({ "role": m.role.as_str(), "content": m.content });
    if m.role == Role::Assistant && !m.tool_calls.is_empty() {
        out["content"] = JsonValue::Null;
        out["tool_calls"] = m
            .tool_calls
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "type": "function",
                    "function": { "name": c.name, "arguments": c.arguments.to_string() }
                })
            })
            .collect();
    }
    if let Some(id) = &m.tool_call_id {
        out["tool_call_id"] = json!(id);
    }
    out
}

fn parse_reply(body: &JsonValue) -> Result<ModelReply, ModelError> {
    let message = body
        .pointer("/choices/0/message")
        .ok_or_else(|| ModelError::Decode("response has no choices".to_string()))?;

    let calls = message
        .get("tool_calls")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if !calls.is_empty() {
        return calls.iter().map(parse_call).collect::<Result<_, _>>().map(ModelReply::ToolCalls);
    }

    message
        .get("content")
        .and_then(JsonValue::as_str)
        .map(|s| ModelReply::Answer(s.to_string()))
        .ok_or_else(|| ModelError::Decode("message has neither content nor tool calls".to_string()))
}

fn parse_call(raw: &JsonValue) -> Result<ToolCall, ModelError> {
    let field = |path: &str| {
        raw.pointer(path)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ModelError::Decode(format!("tool call missing {path}")))
    };
    let id = field("/id")?.to_string();
    let name = field("/function/name")?.to_string();
    let arguments_src = field("/function/arguments")?;
    // Models occasionally emit non-JSON arguments; pass them through as a string.
    let arguments = serde_json::from_str(arguments_src)
        .unwrap_or_else(|_| JsonValue::String(arguments_src.to_string()));
    Ok(ToolCall { id, name, arguments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tool_calls() {
        let body = json!({
            "choices": [{ "message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "render_template", "arguments": "{\"name\":\"welcome\"}" }
                }]
            }}]
        });
        let reply = parse_reply(&body).unwrap();
        assert_eq!(
            reply,
            ModelReply::ToolCalls(vec![ToolCall {
                id: "call_1".to_string(),
                name: "render_template".to_string(),
                arguments: json!({"name": "welcome"}),
            }])
        );
    }

    #[test]
    fn parses_final_answer() {
        let body = json!({ "choices": [{ "message": { "content": "done" } }] });
        assert_eq!(parse_reply(&body).unwrap(), ModelReply::Answer("done".to_string()));
    }

    #[test]
    fn debug_output_hides_key() {
        let model = OpenAiChatModel::new(
            None,
            "gpt-3.5-turbo",
            SecretString::from("sk-secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let rendered = format!("{model:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("https://api.openai.com/v1/chat/completions"));
    }
}
