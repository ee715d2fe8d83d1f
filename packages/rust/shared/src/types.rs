//! Core domain types shared by the fetcher, agent, and scorers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one agent run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// BlogPost
// ---------------------------------------------------------------------------

/// A fetched blog post, normalized from the GraphQL response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    /// Display name of the post author.
    pub author: String,
    /// Markdown body.
    pub content: String,
    /// Canonical `https://{host}/{slug}` address of the post.
    pub source_url: String,
}

// ---------------------------------------------------------------------------
// SummaryResult
// ---------------------------------------------------------------------------

/// Terminal output of the summarization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary_text: String,
}

// ---------------------------------------------------------------------------
// ScoreRecord
// ---------------------------------------------------------------------------

/// One scorer's judgement of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Usually in `[0, 1]`; the accuracy scorer uses the 0 / 0.3 / 0.7 / 1 scale.
    pub score: f64,
    pub explanation: String,
}
