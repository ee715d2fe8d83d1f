//! Language-model capability used by the summarization agent and the judges.
//!
//! The rest of the workspace only sees [`LanguageModel`]: prompt messages in,
//! text or tool calls out. [`OpenAiCompatModel`] speaks the OpenAI-compatible
//! `/chat/completions` protocol (Groq, OpenRouter, vLLM, ...);
//! [`ScriptedModel`] replays canned completions for tests and offline runs.

mod message;
mod openai;
mod scripted;

use async_trait::async_trait;
use postbrief_shared::Result;

pub use message::{
    ChatMessage, Completion, CompletionRequest, FunctionCall, ToolCall, ToolDefinition, Usage,
};
pub use openai::OpenAiCompatModel;
pub use scripted::ScriptedModel;

/// An opaque text-generation backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier sent to the backend.
    fn model_id(&self) -> &str;

    /// Run one completion round-trip.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;
}
