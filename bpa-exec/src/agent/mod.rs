//! AI-agent steps: a bounded tool-using loop over a chat language model.

mod agent_loop;
mod executor;
mod model;
mod openai;
mod tools;

pub use agent_loop::{AgentLoop, ReasoningBackend, ReasoningError, SYSTEM_PROMPT};
pub use executor::{AgentDetails, AgentExecutor};
pub use model::{ChatMessage, LanguageModel, ModelError, ModelReply, Role, ToolCall, ToolSpec};
pub use openai::OpenAiChatModel;
pub use tools::{ReadDocumentTool, RenderTemplateTool, Tool, ToolError, Toolset};
