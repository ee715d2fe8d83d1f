//! Did the agent call the tool it was expected to call?

use async_trait::async_trait;
use postbrief_shared::{Result, ScoreRecord};

use super::Scorer;
use crate::run::AgentRun;

/// Binary check on the run's tool invocations.
///
/// In lenient mode any call to the expected tool scores 1. In strict mode
/// the expected tool must be the only call made.
#[derive(Debug, Clone)]
pub struct ToolCallAccuracyScorer {
    expected_tool: String,
    strict_mode: bool,
}

impl ToolCallAccuracyScorer {
    pub fn new(expected_tool: impl Into<String>, strict_mode: bool) -> Self {
        Self {
            expected_tool: expected_tool.into(),
            strict_mode,
        }
    }

    fn evaluate(&self, called: &[&str]) -> ScoreRecord {
        let expected = self.expected_tool.as_str();

        if called.is_empty() {
            return ScoreRecord {
                score: 0.0,
                explanation: format!("No tools were called; expected `{expected}`."),
            };
        }

        let hit = if self.strict_mode {
            called == [expected]
        } else {
            called.contains(&expected)
        };

        let explanation = if hit {
            format!("Expected tool `{expected}` was called.")
        } else if self.strict_mode && called.contains(&expected) {
            format!(
                "Strict mode: expected only `{expected}`, but {} calls were made: {}.",
                called.len(),
                called.join(", ")
            )
        } else {
            format!(
                "Expected tool `{expected}` was not called (called: {}).",
                called.join(", ")
            )
        };

        ScoreRecord {
            score: if hit { 1.0 } else { 0.0 },
            explanation,
        }
    }
}

#[async_trait]
impl Scorer for ToolCallAccuracyScorer {
    fn id(&self) -> &str {
        "code-tool-call-accuracy-scorer"
    }

    fn name(&self) -> &str {
        "Tool Call Accuracy"
    }

    fn description(&self) -> &str {
        "Checks whether the agent called the expected tool"
    }

    async fn score(&self, run: &AgentRun) -> Result<ScoreRecord> {
        Ok(self.evaluate(&run.tool_names()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL: &str = "blogSummaryTool";

    #[test]
    fn no_calls_scores_zero() {
        let record = ToolCallAccuracyScorer::new(TOOL, false).evaluate(&[]);
        assert_eq!(record.score, 0.0);
        assert!(record.explanation.contains("No tools"));
    }

    #[test]
    fn lenient_accepts_expected_among_others() {
        let scorer = ToolCallAccuracyScorer::new(TOOL, false);
        assert_eq!(scorer.evaluate(&["search", TOOL]).score, 1.0);
        assert_eq!(scorer.evaluate(&[TOOL, TOOL]).score, 1.0);
        assert_eq!(scorer.evaluate(&["search"]).score, 0.0);
    }

    #[test]
    fn strict_requires_a_single_expected_call() {
        let scorer = ToolCallAccuracyScorer::new(TOOL, true);
        assert_eq!(scorer.evaluate(&[TOOL]).score, 1.0);

        let extra = scorer.evaluate(&[TOOL, "search"]);
        assert_eq!(extra.score, 0.0);
        assert!(extra.explanation.starts_with("Strict mode"));

        assert_eq!(scorer.evaluate(&[TOOL, TOOL]).score, 0.0);
    }
}
