//! Summarization agent: standing instructions, the summary prompt, and the
//! tool-calling loop around the language model.

use std::sync::Arc;

use postbrief_llm::{ChatMessage, CompletionRequest, LanguageModel, ToolCall};
use postbrief_shared::{BlogPost, PostbriefError, Result, SummaryConfig, SummaryResult};
use tracing::{debug, info, instrument, warn};

use crate::run::{AgentRun, ToolInvocation};
use crate::tool::{BLOG_TOOL_NAME, BlogSummaryTool};

/// Stable agent identifier.
pub const AGENT_ID: &str = "blog-summary-agent";

/// Display name.
pub const AGENT_NAME: &str = "Hashnode Blog Summary Agent";

/// Standing behavioural instructions sent as the system message.
pub const AGENT_INSTRUCTIONS: &str = "\
You are an expert content researcher and summarizer specializing in technical blog posts from Hashnode.

Your primary function is to fetch blog post content and provide clear, insightful summaries. When responding:
- Always ask for the blog URL or the slug and hostname if not provided.
- Extract key takeaways, technical concepts, and the main thesis of the article.
- Use bullet points for readability and maintain a professional yet engaging tone.
- If the post is highly technical, explain complex terms simply but accurately.
- If the user asks for a specific summary format (e.g., \"TL;DR\" or \"Executive Summary\"), follow that strictly.
- Always credit the author of the post in your response.

Use the blogSummaryTool to fetch the markdown content of the post.";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub instructions: String,
    /// Post bodies are cut to this many characters.
    pub max_content_chars: usize,
    /// Model round-trips allowed per call before giving up.
    pub max_steps: u32,
}

impl AgentConfig {
    pub fn from_summary_config(summary: &SummaryConfig) -> Self {
        Self {
            max_content_chars: summary.max_content_chars,
            max_steps: summary.max_tool_steps.max(1),
            ..Self::default()
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        let summary = SummaryConfig::default();
        Self {
            id: AGENT_ID.into(),
            name: AGENT_NAME.into(),
            instructions: AGENT_INSTRUCTIONS.into(),
            max_content_chars: summary.max_content_chars,
            max_steps: summary.max_tool_steps,
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// First `max_chars` characters of `content`. Never splits a character.
pub fn truncate_content(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Render the fixed summary prompt for a fetched post.
pub fn build_summary_prompt(post: &BlogPost, max_chars: usize) -> String {
    let content = truncate_content(&post.content, max_chars);
    let url = &post.source_url;

    format!(
        "Please summarize the following Hashnode blog post:

TITLE: {title}
AUTHOR: {author}
URL: {url}

CONTENT:
{content}

Structure your response as follows:

TITLE: [Post Title]
AUTHOR: [Author Name]
═══════════════════════════

CORE THESIS
[One sentence describing the main goal of the post]

KEY TECHNICAL TAKEAWAYS
• [Point 1] - [Brief explanation]
• [Point 2] - [Brief explanation]
• [Point 3] - [Brief explanation]

SUMMARY
[A 2-3 paragraph concise summary of the article]

ORIGINAL POST: {url}
",
        title = post.title,
        author = post.author,
    )
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Language model plus instructions plus the blog tool.
pub struct SummaryAgent {
    config: AgentConfig,
    model: Arc<dyn LanguageModel>,
    tool: BlogSummaryTool,
}

impl SummaryAgent {
    pub fn new(config: AgentConfig, model: Arc<dyn LanguageModel>, tool: BlogSummaryTool) -> Self {
        Self {
            config,
            model,
            tool,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Summarize an already fetched post.
    pub async fn summarize(&self, post: &BlogPost) -> Result<(SummaryResult, AgentRun)> {
        let prompt = build_summary_prompt(post, self.config.max_content_chars);
        let run = self.generate(&prompt).await?;

        let summary_text = run.assistant_text().unwrap_or_default().to_string();
        Ok((SummaryResult { summary_text }, run))
    }

    /// Answer one user message, calling the blog tool as the model requests.
    ///
    /// Loops until the model replies without tool calls or the step budget
    /// runs out. The final reply is returned as-is.
    #[instrument(skip_all, fields(agent = %self.config.id, model = %self.model.model_id()))]
    pub async fn generate(&self, user_text: &str) -> Result<AgentRun> {
        let user = ChatMessage::user(user_text);
        let mut run = AgentRun::new(&self.config.id, vec![user.clone()]);
        let mut messages = vec![ChatMessage::system(&self.config.instructions), user];
        let tools = vec![self.tool.definition()];

        for step in 1..=self.config.max_steps {
            let request = CompletionRequest {
                messages: messages.clone(),
                tools: tools.clone(),
                json_output: false,
            };
            let completion = self.model.complete(&request).await?;

            let reply = completion.to_message();
            messages.push(reply.clone());
            run.output.push(reply);

            if completion.tool_calls.is_empty() {
                if completion.text.as_deref().is_none_or(|t| t.trim().is_empty()) {
                    return Err(PostbriefError::Model(format!(
                        "{} returned neither text nor tool calls",
                        self.model.model_id()
                    )));
                }
                info!(step, run_id = %run.run_id, "agent finished");
                return Ok(run);
            }

            debug!(step, calls = completion.tool_calls.len(), "model requested tools");

            for call in &completion.tool_calls {
                let invocation = self.dispatch(call).await;
                let content = invocation.output.to_string();
                messages.push(ChatMessage::tool(&call.id, &content));
                run.output.push(ChatMessage::tool(&call.id, content));
                run.tool_invocations.push(invocation);
            }
        }

        Err(PostbriefError::Model(format!(
            "agent exceeded {} model steps without a final reply",
            self.config.max_steps
        )))
    }

    /// Execute one tool call. Unknown tools are reported back to the model.
    async fn dispatch(&self, call: &ToolCall) -> ToolInvocation {
        let arguments = serde_json::from_str(&call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        let output = if call.function.name == BLOG_TOOL_NAME {
            let out = self.tool.call(&call.function.arguments).await;
            serde_json::to_value(&out).unwrap_or_else(|e| {
                serde_json::json!({ "summaryStatus": format!("failed to encode tool output: {e}") })
            })
        } else {
            warn!(tool = %call.function.name, "model called an unknown tool");
            serde_json::json!({ "error": format!("unknown tool: {}", call.function.name) })
        };

        ToolInvocation {
            call_id: call.id.clone(),
            name: call.function.name.clone(),
            arguments,
            output,
        }
    }
}
