//! Term coverage: how much of the input's vocabulary the reply carries over.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use postbrief_shared::{Result, ScoreRecord};
use regex::Regex;

use super::Scorer;
use crate::run::AgentRun;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "any", "are", "because", "been", "before",
    "being", "but", "can", "could", "did", "does", "doing", "each", "for", "from", "had", "has",
    "have", "her", "here", "him", "his", "how", "into", "its", "just", "more", "most", "not",
    "now", "off", "once", "only", "other", "our", "out", "over", "own", "please", "same", "she",
    "should", "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "too", "under", "until", "very", "was", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your",
];

/// Key terms of `text`: lowercase words of three or more characters that
/// are not stop words, plus every number.
fn key_terms(text: &str) -> BTreeSet<String> {
    static WORD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| {
            w.chars().all(|c| c.is_ascii_digit())
                || (w.chars().count() >= 3 && !STOP_WORDS.contains(w))
        })
        .map(str::to_string)
        .collect()
}

/// Deterministic coverage of the user's key terms in the final reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessScorer;

impl CompletenessScorer {
    fn evaluate(input: &str, output: &str) -> ScoreRecord {
        let wanted = key_terms(input);
        if wanted.is_empty() {
            return ScoreRecord {
                score: 1.0,
                explanation: "Input has no key terms to cover.".into(),
            };
        }

        let present = key_terms(output);
        let covered = wanted.intersection(&present).count();
        let score = covered as f64 / wanted.len() as f64;

        ScoreRecord {
            score,
            explanation: format!(
                "Covered {covered} of {} key terms from the input.",
                wanted.len()
            ),
        }
    }
}

#[async_trait]
impl Scorer for CompletenessScorer {
    fn id(&self) -> &str {
        "completeness-scorer"
    }

    fn name(&self) -> &str {
        "Completeness"
    }

    fn description(&self) -> &str {
        "Measures how many key terms from the input appear in the reply"
    }

    async fn score(&self, run: &AgentRun) -> Result<ScoreRecord> {
        Ok(Self::evaluate(
            run.user_text().unwrap_or_default(),
            run.assistant_text().unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_skip_short_and_stop_words_but_keep_numbers() {
        let terms = key_terms("The API serves 3 of the GraphQL queries at 99 ms");
        let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
        assert_eq!(terms, vec!["3", "99", "api", "graphql", "queries", "serves"]);
    }

    #[test]
    fn full_and_partial_coverage() {
        let full = CompletenessScorer::evaluate("GraphQL caching", "Caching in GraphQL.");
        assert_eq!(full.score, 1.0);

        let half = CompletenessScorer::evaluate("GraphQL caching", "It is about GraphQL.");
        assert_eq!(half.score, 0.5);
        assert_eq!(half.explanation, "Covered 1 of 2 key terms from the input.");
    }

    #[test]
    fn empty_input_scores_one() {
        assert_eq!(CompletenessScorer::evaluate("", "anything").score, 1.0);
        assert_eq!(CompletenessScorer::evaluate("is it ok?", "").score, 1.0);
    }

    #[test]
    fn empty_reply_scores_zero() {
        assert_eq!(CompletenessScorer::evaluate("GraphQL caching", "").score, 0.0);
    }
}
