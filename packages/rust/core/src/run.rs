//! The record of one agent run: what went in, what came out, which tools ran.
//!
//! Scorers read a completed [`AgentRun`]; nothing mutates it after the
//! agent returns.

use chrono::{DateTime, Utc};
use postbrief_llm::ChatMessage;
use postbrief_shared::RunId;
use serde::{Deserialize, Serialize};

/// One executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Model-assigned call id.
    pub call_id: String,
    pub name: String,
    /// Decoded arguments (`null` when the model sent malformed JSON).
    pub arguments: serde_json::Value,
    pub output: serde_json::Value,
}

/// Input/output transcript of a single agent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    pub run_id: RunId,
    pub agent_id: String,
    pub started_at: DateTime<Utc>,
    /// Caller-supplied messages (system instructions excluded).
    pub input: Vec<ChatMessage>,
    /// Assistant and tool messages produced during the run.
    pub output: Vec<ChatMessage>,
    pub tool_invocations: Vec<ToolInvocation>,
}

impl AgentRun {
    pub fn new(agent_id: impl Into<String>, input: Vec<ChatMessage>) -> Self {
        Self {
            run_id: RunId::new(),
            agent_id: agent_id.into(),
            started_at: Utc::now(),
            input,
            output: Vec::new(),
            tool_invocations: Vec::new(),
        }
    }

    /// Text of the first user message.
    pub fn user_text(&self) -> Option<&str> {
        self.input.iter().find_map(|m| match m {
            ChatMessage::User { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Text of the agent's final reply.
    pub fn assistant_text(&self) -> Option<&str> {
        self.output.iter().rev().find_map(|m| match m {
            ChatMessage::Assistant {
                content: Some(content),
                ..
            } if !content.trim().is_empty() => Some(content.as_str()),
            _ => None,
        })
    }

    /// Names of the tools invoked, in call order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tool_invocations
            .iter()
            .map(|t| t.name.as_str())
            .collect()
    }
}
