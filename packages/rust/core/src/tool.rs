//! `blogSummaryTool`: the fetcher exposed as an agent-callable tool.
//!
//! The tool never fails. Missing posts and broken requests are reported in
//! `summaryStatus` so the agent can tell the user what went wrong.

use postbrief_hashnode::{FetchOutcome, HashnodeClient, PostLocator};
use postbrief_llm::ToolDefinition;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::agent::truncate_content;

/// Name the model uses to call the tool.
pub const BLOG_TOOL_NAME: &str = "blogSummaryTool";

/// Stable tool identifier.
pub const BLOG_TOOL_ID: &str = "get-hashnode-summary";

/// `summaryStatus` value for a successful fetch.
pub const STATUS_SUCCESS: &str = "Success";

const BLOG_TOOL_DESCRIPTION: &str = "Fetches a Hashnode blog post's title, author and markdown content. \
     Pass either the full post `url`, or the `postSlug` together with the publication `hostname`.";

/// Tool arguments: a full URL or an explicit slug/host pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlogToolInput {
    Url {
        url: String,
    },
    SlugAndHost {
        #[serde(rename = "postSlug")]
        post_slug: String,
        hostname: String,
    },
}

impl BlogToolInput {
    fn locator(&self) -> postbrief_shared::Result<PostLocator> {
        match self {
            Self::Url { url } => PostLocator::from_url(url),
            Self::SlugAndHost {
                post_slug,
                hostname,
            } => PostLocator::new(post_slug.as_str(), hostname.as_str()),
        }
    }
}

/// Tool result, always returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogToolOutput {
    pub title: String,
    pub author: String,
    pub content: String,
    /// `"Success"` or a human-readable error.
    pub summary_status: String,
}

impl BlogToolOutput {
    pub fn is_success(&self) -> bool {
        self.summary_status == STATUS_SUCCESS
    }

    fn not_found(host: &str, slug: &str) -> Self {
        Self {
            title: "Not Found".into(),
            author: "N/A".into(),
            content: String::new(),
            summary_status: format!(
                "Error: Post not found. Tried host: \"{host}\" and slug: \"{slug}\"."
            ),
        }
    }

    fn failed(message: impl std::fmt::Display) -> Self {
        Self {
            title: "Error".into(),
            author: "N/A".into(),
            content: String::new(),
            summary_status: format!("Failed to parse URL or connect to API: {message}"),
        }
    }
}

/// The fetcher wrapped in the tool calling convention.
#[derive(Debug, Clone)]
pub struct BlogSummaryTool {
    client: HashnodeClient,
    max_content_chars: usize,
}

impl BlogSummaryTool {
    pub fn new(client: HashnodeClient, max_content_chars: usize) -> Self {
        Self {
            client,
            max_content_chars,
        }
    }

    /// Function definition advertised to the model.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: BLOG_TOOL_NAME.into(),
            description: BLOG_TOOL_DESCRIPTION.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The full Hashnode blog post URL"
                    },
                    "postSlug": {
                        "type": "string",
                        "description": "The URL slug of the post"
                    },
                    "hostname": {
                        "type": "string",
                        "description": "The blog domain (e.g. engineering.hashnode.com)"
                    }
                }
            }),
        }
    }

    /// Run the tool with raw JSON arguments as sent by the model.
    pub async fn call(&self, arguments: &str) -> BlogToolOutput {
        match serde_json::from_str::<BlogToolInput>(arguments) {
            Ok(input) => self.execute(&input).await,
            Err(e) => BlogToolOutput::failed(format!("invalid tool arguments: {e}")),
        }
    }

    /// Fetch the post addressed by `input`.
    #[instrument(skip_all, fields(tool = BLOG_TOOL_ID))]
    pub async fn execute(&self, input: &BlogToolInput) -> BlogToolOutput {
        let locator = match input.locator() {
            Ok(locator) => locator,
            Err(e) => return BlogToolOutput::failed(e),
        };

        info!(host = %locator.host, slug = %locator.slug, "tool fetching post");

        match self.client.fetch_post_lenient(&locator).await {
            FetchOutcome::Found(post) => BlogToolOutput {
                title: post.title,
                author: post.author,
                content: truncate_content(&post.content, self.max_content_chars).to_string(),
                summary_status: STATUS_SUCCESS.into(),
            },
            FetchOutcome::NotFound { host, slug } => BlogToolOutput::not_found(&host, &slug),
            FetchOutcome::Failed { message } => BlogToolOutput::failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postbrief_shared::HashnodeConfig;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer, max_chars: usize) -> BlogSummaryTool {
        let client = HashnodeClient::new(&HashnodeConfig {
            endpoint: server.uri(),
            timeout_secs: 5,
        })
        .unwrap();
        BlogSummaryTool::new(client, max_chars)
    }

    async fn mount_not_found(server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "publication": { "post": null } }
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn input_accepts_both_shapes() {
        let by_url: BlogToolInput =
            serde_json::from_str(r#"{"url":"https://a.dev/post"}"#).unwrap();
        assert!(matches!(by_url, BlogToolInput::Url { .. }));

        let by_pair: BlogToolInput =
            serde_json::from_str(r#"{"postSlug":"post","hostname":"a.dev"}"#).unwrap();
        assert_eq!(
            by_pair,
            BlogToolInput::SlugAndHost {
                post_slug: "post".into(),
                hostname: "a.dev".into(),
            }
        );
    }

    #[test]
    fn output_uses_summary_status_field() {
        let json = serde_json::to_value(BlogToolOutput::not_found("a.dev", "post")).unwrap();
        assert_eq!(json["title"], "Not Found");
        assert!(json["summaryStatus"].as_str().unwrap().starts_with("Error: Post not found"));
    }

    #[tokio::test]
    async fn found_post_is_success_and_truncated() {
        let server = MockServer::start().await;
        let body = "x".repeat(50);

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "host": "hashnode.com/blog", "slug": "launch" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "publication": { "post": {
                    "title": "Launch",
                    "author": { "name": "Ada" },
                    "content": { "markdown": body }
                } } }
            })))
            .mount(&server)
            .await;

        let out = tool_for(&server, 20)
            .call(r#"{"url":"https://hashnode.com/blog/launch"}"#)
            .await;

        assert!(out.is_success());
        assert_eq!(out.title, "Launch");
        assert_eq!(out.author, "Ada");
        assert_eq!(out.content, "x".repeat(20));
    }

    #[tokio::test]
    async fn missing_post_reports_host_and_slug_without_failing() {
        let server = MockServer::start().await;
        mount_not_found(&server).await;

        let out = tool_for(&server, 100)
            .call(r#"{"postSlug":"ghost-post","hostname":"blog.example.dev"}"#)
            .await;

        assert!(!out.is_success());
        assert_eq!(out.title, "Not Found");
        assert_eq!(out.author, "N/A");
        assert!(out.content.is_empty());
        assert!(out.summary_status.contains("\"blog.example.dev\""));
        assert!(out.summary_status.contains("\"ghost-post\""));
    }

    #[tokio::test]
    async fn bad_url_is_reported_in_status() {
        let server = MockServer::start().await;
        let out = tool_for(&server, 100).call(r#"{"url":"not a url"}"#).await;

        assert_eq!(out.title, "Error");
        assert!(out.summary_status.starts_with("Failed to parse URL or connect to API:"));
    }

    #[tokio::test]
    async fn malformed_arguments_are_reported_in_status() {
        let server = MockServer::start().await;
        let out = tool_for(&server, 100).call(r#"{"slug":"x"}"#).await;

        assert_eq!(out.title, "Error");
        assert!(out.summary_status.contains("invalid tool arguments"));
    }
}
