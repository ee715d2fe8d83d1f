//! Model-judged scoring: preprocess → analyze → score → reason.
//!
//! A [`JudgeRubric`] supplies the judge instructions, the prompt, the verdict
//! shape and the pure scoring rule. [`JudgedScorer`] drives the judge model
//! and turns any of these into a [`Scorer`].

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use postbrief_llm::{ChatMessage, CompletionRequest, LanguageModel};
use postbrief_shared::{PostbriefError, Result, ScoreRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::Scorer;
use crate::run::AgentRun;

/// Texts extracted from a run before judging. Missing messages become "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgeInput {
    pub user_text: String,
    pub assistant_text: String,
}

impl JudgeInput {
    pub fn from_run(run: &AgentRun) -> Self {
        Self {
            user_text: run.user_text().unwrap_or_default().to_string(),
            assistant_text: run.assistant_text().unwrap_or_default().to_string(),
        }
    }
}

/// One judged quality dimension.
pub trait JudgeRubric: Send + Sync {
    /// Structured verdict the judge must return.
    type Verdict: DeserializeOwned + Debug + Send;

    const ID: &'static str;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    /// System instructions for the judge model.
    const INSTRUCTIONS: &'static str;

    /// Build the analysis prompt.
    fn prompt(&self, input: &JudgeInput) -> String;

    /// Reject verdicts whose numbers fall outside their declared range.
    fn validate(&self, _verdict: &Self::Verdict) -> std::result::Result<(), String> {
        Ok(())
    }

    fn score(&self, verdict: &Self::Verdict) -> f64;

    fn reason(&self, verdict: &Self::Verdict, score: f64) -> String;
}

/// Check that a judge-reported ratio lies in `[0, 1]`.
pub(crate) fn check_unit(field: &str, value: f64) -> std::result::Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be between 0 and 1, got {value}"))
    }
}

/// Decode a judge reply into `T`.
///
/// The reply must be a single JSON object, optionally wrapped in a
/// Markdown code fence.
pub fn parse_verdict<T: DeserializeOwned>(reply: &str) -> std::result::Result<T, String> {
    let body = strip_code_fence(reply.trim());
    serde_json::from_str(body).map_err(|e| format!("judge reply is not a valid verdict: {e}"))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string (e.g. "json") on the opening line
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// A [`Scorer`] backed by a judge model and a [`JudgeRubric`].
pub struct JudgedScorer<R> {
    rubric: R,
    judge: Arc<dyn LanguageModel>,
}

impl<R: JudgeRubric> JudgedScorer<R> {
    pub fn new(rubric: R, judge: Arc<dyn LanguageModel>) -> Self {
        Self { rubric, judge }
    }

    /// Ask the judge for a verdict on `input`.
    pub async fn analyze(&self, input: &JudgeInput) -> Result<R::Verdict> {
        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(R::INSTRUCTIONS),
                ChatMessage::user(self.rubric.prompt(input)),
            ],
            tools: Vec::new(),
            json_output: true,
        };

        let completion = self.judge.complete(&request).await?;
        let reply = completion
            .text
            .ok_or_else(|| PostbriefError::judge(R::ID, "judge returned an empty reply"))?;

        let verdict: R::Verdict =
            parse_verdict(&reply).map_err(|msg| PostbriefError::judge(R::ID, msg))?;
        self.rubric
            .validate(&verdict)
            .map_err(|msg| PostbriefError::judge(R::ID, msg))?;

        debug!(?verdict, "judge verdict");
        Ok(verdict)
    }
}

#[async_trait]
impl<R: JudgeRubric> Scorer for JudgedScorer<R> {
    fn id(&self) -> &str {
        R::ID
    }

    fn name(&self) -> &str {
        R::NAME
    }

    fn description(&self) -> &str {
        R::DESCRIPTION
    }

    #[instrument(skip_all, fields(scorer = R::ID, judge = self.judge.model_id()))]
    async fn score(&self, run: &AgentRun) -> Result<ScoreRecord> {
        let input = JudgeInput::from_run(run);
        let verdict = self.analyze(&input).await?;
        let score = self.rubric.score(&verdict);
        Ok(ScoreRecord {
            score,
            explanation: self.rubric.reason(&verdict, score),
        })
    }
}
