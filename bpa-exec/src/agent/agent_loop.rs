use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::agent::model::{ChatMessage, LanguageModel, ModelError, ModelReply};
use crate::agent::tools::Toolset;

pub const SYSTEM_PROMPT: &str = "You are an AI agent that helps automate business processes. \
Use the available tools when they help. When you are done, reply with the final answer only.";

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReasoningError {
    #[error("agent did not converge within {0} turns")]
    TurnBudgetExceeded(usize),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Runs a natural-language task to completion with a fixed toolset.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn run(&self, prompt: &str, toolset: &Toolset) -> Result<String, ReasoningError>;
}

/// Tool-calling loop over a chat model.
///
/// Each turn is one model call. A turn that requests tools feeds their output
/// (or their error text) back to the model; a turn that answers ends the loop.
pub struct AgentLoop {
    model: Arc<dyn LanguageModel>,
    max_turns: usize,
}

impl AgentLoop {
    pub fn new(model: Arc<dyn LanguageModel>, max_turns: usize) -> Self {
        Self { model, max_turns }
    }
}

#[async_trait]
impl ReasoningBackend for AgentLoop {
    async fn run(&self, prompt: &str, toolset: &Toolset) -> Result<String, ReasoningError> {
        let specs = toolset.specs();
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];

        for turn in 1..=self.max_turns {
            let calls = match self.model.complete(&messages, &specs).await? {
                ModelReply::Answer(answer) => {
                    debug!(turn, "agent answered");
                    return Ok(answer);
                }
                ModelReply::ToolCalls(calls) => calls,
            };

            messages.push(ChatMessage::assistant_calls(calls.clone()));
            for call in calls {
                debug!(turn, tool = %call.name, "agent tool call");
                let observation = match toolset.get(&call.name) {
                    Some(tool) => match tool.call(&call.arguments).await {
                        Ok(output) => output,
                        Err(e) => format!("error: {e}"),
                    },
                    None => format!("error: unknown tool `{}`", call.name),
                };
                messages.push(ChatMessage::tool(call.id, observation));
            }
        }

        Err(ReasoningError::TurnBudgetExceeded(self.max_turns))
    }
}
