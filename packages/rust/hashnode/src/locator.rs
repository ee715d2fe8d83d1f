//! Post addressing: turns a post URL or an explicit slug/host pair into the
//! `(host, slug)` variables the GraphQL API expects.
//!
//! Publications are addressed by hostname. The platform's own blog lives
//! under the marketing domain (`hashnode.com/blog/...`) and is served by the
//! multi-tenant API as the virtual host `hashnode.com/blog`.

use postbrief_shared::{PostbriefError, Result};
use url::Url;

/// The platform's bare marketing domain.
const PLATFORM_DOMAIN: &str = "hashnode.com";

/// Path prefix of the platform's own blog on the marketing domain.
const PLATFORM_BLOG_PREFIX: &str = "/blog";

/// A `(host, slug)` pair identifying one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLocator {
    /// Publication host as understood by the API (may contain a path, see module docs).
    pub host: String,
    /// Final path segment of the post URL.
    pub slug: String,
}

impl PostLocator {
    /// Build a locator from an explicit slug and hostname.
    pub fn new(slug: impl Into<String>, host: impl Into<String>) -> Result<Self> {
        let slug = slug.into().trim().to_string();
        let host = host.into().trim().to_string();

        if host.is_empty() {
            return Err(PostbriefError::InvalidLocator("hostname is empty".into()));
        }
        if slug.is_empty() {
            return Err(PostbriefError::InvalidLocator("post slug is empty".into()));
        }

        Ok(Self { host, slug })
    }

    /// Derive a locator from a full post URL.
    ///
    /// The host is the URL's hostname, rewritten to `hashnode.com/blog` for
    /// posts on the platform blog. The slug is the last non-empty path segment.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| PostbriefError::InvalidLocator(format!("{raw}: {e}")))?;

        let hostname = url
            .host_str()
            .ok_or_else(|| PostbriefError::InvalidLocator(format!("URL has no host: {raw}")))?;

        let host = if hostname == PLATFORM_DOMAIN && url.path().starts_with(PLATFORM_BLOG_PREFIX) {
            format!("{PLATFORM_DOMAIN}{PLATFORM_BLOG_PREFIX}")
        } else {
            hostname.to_string()
        };

        let slug = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .ok_or_else(|| {
                PostbriefError::InvalidLocator(format!("URL has no post slug in its path: {raw}"))
            })?
            .to_string();

        Ok(Self { host, slug })
    }

    /// Public address of the post, used for attribution in summaries.
    pub fn canonical_url(&self) -> String {
        format!("https://{}/{}", self.host, self.slug)
    }
}

impl std::fmt::Display for PostLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.host, self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_domain_url() {
        let loc = PostLocator::from_url("https://engineering.hashnode.com/building-a-graphql-api")
            .unwrap();
        assert_eq!(loc.host, "engineering.hashnode.com");
        assert_eq!(loc.slug, "building-a-graphql-api");
    }

    #[test]
    fn platform_blog_rewrites_host() {
        let loc = PostLocator::from_url("https://hashnode.com/blog/introducing-docs-by-hashnode")
            .unwrap();
        assert_eq!(loc.host, "hashnode.com/blog");
        assert_eq!(loc.slug, "introducing-docs-by-hashnode");
    }

    #[test]
    fn platform_domain_outside_blog_keeps_host() {
        let loc = PostLocator::from_url("https://hashnode.com/post/some-post").unwrap();
        assert_eq!(loc.host, "hashnode.com");
        assert_eq!(loc.slug, "some-post");
    }

    #[test]
    fn subdomain_of_platform_is_not_rewritten() {
        let loc = PostLocator::from_url("https://blog.hashnode.com/blog/post").unwrap();
        assert_eq!(loc.host, "blog.hashnode.com");
    }

    #[test]
    fn slug_is_last_non_empty_segment() {
        let loc = PostLocator::from_url("https://example.dev/series/rust/my-post/").unwrap();
        assert_eq!(loc.slug, "my-post");

        let loc = PostLocator::from_url("https://example.dev//a//b//").unwrap();
        assert_eq!(loc.slug, "b");
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        let loc = PostLocator::from_url("https://example.dev/my-post?source=feed#intro").unwrap();
        assert_eq!(loc.slug, "my-post");
    }

    #[test]
    fn url_without_path_is_rejected() {
        let err = PostLocator::from_url("https://example.dev/").unwrap_err();
        assert!(matches!(err, PostbriefError::InvalidLocator(_)));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let err = PostLocator::from_url("not a url").unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn explicit_pair_is_trimmed_and_validated() {
        let loc = PostLocator::new(" my-post ", "blog.example.dev").unwrap();
        assert_eq!(loc.slug, "my-post");
        assert!(PostLocator::new("", "blog.example.dev").is_err());
        assert!(PostLocator::new("my-post", "  ").is_err());
    }

    #[test]
    fn canonical_url_joins_host_and_slug() {
        let loc = PostLocator::new("my-post", "blog.example.dev").unwrap();
        assert_eq!(loc.canonical_url(), "https://blog.example.dev/my-post");
        assert_eq!(loc.to_string(), "blog.example.dev/my-post");
    }
}
