//! Blog post fetcher for the Hashnode GraphQL API.
//!
//! One fetch capability, two calling conventions:
//! - [`HashnodeClient::fetch_post`] is strict: a missing post is an error.
//! - [`HashnodeClient::fetch_post_lenient`] never fails: every outcome,
//!   including transport and decode failures, comes back as a [`FetchOutcome`].
//!
//! Each call is a single POST with no retries.

mod locator;

use std::time::Duration;

use postbrief_shared::{BlogPost, HashnodeConfig, PostbriefError, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub use locator::PostLocator;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("postbrief/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt kept in error messages.
const ERROR_BODY_EXCERPT: usize = 300;

/// Query for a single post by publication host and slug.
const POST_QUERY: &str = r#"
query GetPost($host: String!, $slug: String!) {
  publication(host: $host) {
    post(slug: $slug) {
      title
      author { name }
      content { markdown }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(default)]
    publication: Option<Publication>,
}

#[derive(Debug, Deserialize)]
struct Publication {
    #[serde(default)]
    post: Option<PostNode>,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    title: String,
    author: AuthorNode,
    content: ContentNode,
}

#[derive(Debug, Deserialize)]
struct AuthorNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentNode {
    markdown: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

// ---------------------------------------------------------------------------
// FetchOutcome
// ---------------------------------------------------------------------------

/// Result of a lenient fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The post was found and normalized.
    Found(BlogPost),
    /// The API answered but has no post at this host/slug.
    NotFound { host: String, slug: String },
    /// Anything other than a decodable 2xx envelope.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client over the publishing platform's GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct HashnodeClient {
    client: Client,
    endpoint: String,
}

impl HashnodeClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &HashnodeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PostbriefError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Fetch a post, treating absence as an error.
    #[instrument(skip_all, fields(host = %locator.host, slug = %locator.slug))]
    pub async fn fetch_post(&self, locator: &PostLocator) -> Result<BlogPost> {
        let response = self.query(locator).await?;

        for err in &response.errors {
            debug!(message = %err.message, "graphql error");
        }

        let post = response
            .data
            .and_then(|d| d.publication)
            .and_then(|p| p.post)
            .ok_or_else(|| PostbriefError::PostNotFound {
                host: locator.host.clone(),
                slug: locator.slug.clone(),
            })?;

        info!(title = %post.title, author = %post.author.name, "post fetched");

        Ok(BlogPost {
            title: post.title,
            author: post.author.name,
            content: post.content.markdown,
            source_url: locator.canonical_url(),
        })
    }

    /// Fetch a post without ever returning an error.
    pub async fn fetch_post_lenient(&self, locator: &PostLocator) -> FetchOutcome {
        match self.fetch_post(locator).await {
            Ok(post) => FetchOutcome::Found(post),
            Err(PostbriefError::PostNotFound { host, slug }) => {
                warn!(%host, %slug, "post not found");
                FetchOutcome::NotFound { host, slug }
            }
            Err(e) => {
                warn!(error = %e, "post fetch failed");
                FetchOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// POST the query and decode the envelope.
    async fn query(&self, locator: &PostLocator) -> Result<GraphqlResponse> {
        let body = serde_json::json!({
            "query": POST_QUERY,
            "variables": {
                "host": locator.host,
                "slug": locator.slug,
            },
        });

        debug!(endpoint = %self.endpoint, "posting graphql query");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| PostbriefError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            PostbriefError::Network(format!("{}: failed to read body: {e}", self.endpoint))
        })?;

        // Unknown publications come back inside a 200 envelope. Anything else
        // is an outage, even when the body is a GraphQL error document.
        if !status.is_success() {
            let detail = serde_json::from_str::<GraphqlResponse>(&text)
                .ok()
                .and_then(|r| r.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or_else(|| text.chars().take(ERROR_BODY_EXCERPT).collect());
            return Err(PostbriefError::Network(format!(
                "{}: HTTP {status}: {detail}",
                self.endpoint
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            PostbriefError::parse(format!(
                "{}: HTTP {status}, invalid GraphQL response: {e}",
                self.endpoint
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HashnodeClient {
        let config = HashnodeConfig {
            endpoint: server.uri(),
            timeout_secs: 5,
        };
        HashnodeClient::new(&config).unwrap()
    }

    fn post_fixture() -> serde_json::Value {
        let content = std::fs::read_to_string("../../../fixtures/graphql/post.fixture.json")
            .expect("read post fixture");
        serde_json::from_str(&content).expect("parse post fixture")
    }

    #[tokio::test]
    async fn fetch_post_normalizes_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "host": "engineering.hashnode.com", "slug": "graphql-at-scale" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_fixture()))
            .expect(1)
            .mount(&server)
            .await;

        let locator = PostLocator::new("graphql-at-scale", "engineering.hashnode.com").unwrap();
        let post = client_for(&server).fetch_post(&locator).await.unwrap();

        assert_eq!(post.title, "Running GraphQL at Scale");
        assert_eq!(post.author, "Sandeep Panda");
        assert!(post.content.starts_with("# Why GraphQL"));
        assert_eq!(post.source_url, "https://engineering.hashnode.com/graphql-at-scale");
    }

    #[tokio::test]
    async fn missing_post_is_an_error_in_strict_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "publication": { "post": null } }
            })))
            .mount(&server)
            .await;

        let locator = PostLocator::new("no-such-post", "blog.example.dev").unwrap();
        let err = client_for(&server).fetch_post(&locator).await.unwrap_err();

        match err {
            PostbriefError::PostNotFound { host, slug } => {
                assert_eq!(host, "blog.example.dev");
                assert_eq!(slug, "no-such-post");
            }
            other => panic!("expected PostNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_publication_is_not_found_in_lenient_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "publication": null },
                "errors": [{ "message": "Publication not found" }]
            })))
            .mount(&server)
            .await;

        let locator = PostLocator::new("no-such-post", "nowhere.example.dev").unwrap();
        let outcome = client_for(&server).fetch_post_lenient(&locator).await;

        assert_eq!(
            outcome,
            FetchOutcome::NotFound {
                host: "nowhere.example.dev".into(),
                slug: "no-such-post".into(),
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_failure_in_lenient_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&server)
            .await;

        let locator = PostLocator::new("post", "blog.example.dev").unwrap();
        let client = client_for(&server);

        match client.fetch_post_lenient(&locator).await {
            FetchOutcome::Failed { message } => assert!(message.contains("502")),
            other => panic!("expected Failed, got {other:?}"),
        }

        let err = client.fetch_post(&locator).await.unwrap_err();
        assert!(matches!(err, PostbriefError::Network(_)));
    }

    #[tokio::test]
    async fn server_error_with_graphql_errors_is_not_a_missing_post() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "errors": [{ "message": "Internal server error" }]
            })))
            .mount(&server)
            .await;

        let locator = PostLocator::new("post", "blog.example.dev").unwrap();
        let client = client_for(&server);

        match client.fetch_post_lenient(&locator).await {
            FetchOutcome::Failed { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("Internal server error"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }

        let err = client.fetch_post(&locator).await.unwrap_err();
        assert!(matches!(err, PostbriefError::Network(_)));
    }

    #[tokio::test]
    async fn invalid_json_in_a_success_reply_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let locator = PostLocator::new("post", "blog.example.dev").unwrap();
        let err = client_for(&server).fetch_post(&locator).await.unwrap_err();
        assert!(matches!(err, PostbriefError::Parse { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_failure() {
        let config = HashnodeConfig {
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
        };
        let client = HashnodeClient::new(&config).unwrap();
        let locator = PostLocator::new("post", "blog.example.dev").unwrap();

        let err = client.fetch_post(&locator).await.unwrap_err();
        assert!(matches!(err, PostbriefError::Network(_)));
    }
}
