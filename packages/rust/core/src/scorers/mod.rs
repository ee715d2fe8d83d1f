//! Quality scorers for completed agent runs.
//!
//! Three scorers ask a judge model for a structured verdict and reduce it
//! with a pure scoring function ([`JudgedScorer`] + a [`JudgeRubric`]); two
//! are deterministic code scorers. All of them only read the run, so
//! [`score_run`] evaluates them concurrently.

mod accuracy;
mod completeness;
mod conciseness;
mod judge;
mod summarization;
mod tool_call;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use postbrief_llm::LanguageModel;
use postbrief_shared::{Result, RunId, ScoreRecord};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::run::AgentRun;
use crate::tool::BLOG_TOOL_NAME;

pub use accuracy::{AccuracyRubric, AccuracyVerdict};
pub use completeness::CompletenessScorer;
pub use conciseness::{ConcisenessRubric, ConcisenessVerdict};
pub use judge::{JudgeInput, JudgeRubric, JudgedScorer, parse_verdict};
pub use summarization::{SummarizationRubric, SummarizationVerdict};
pub use tool_call::ToolCallAccuracyScorer;

/// A unit that turns a run into a score and an explanation.
#[async_trait]
pub trait Scorer: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Score a completed run.
    async fn score(&self, run: &AgentRun) -> Result<ScoreRecord>;
}

/// The standard catalogue: tool-call, completeness, accuracy,
/// summarization quality, conciseness.
pub fn default_scorers(judge: Arc<dyn LanguageModel>) -> Vec<Box<dyn Scorer>> {
    vec![
        Box::new(ToolCallAccuracyScorer::new(BLOG_TOOL_NAME, false)),
        Box::new(CompletenessScorer),
        Box::new(JudgedScorer::new(AccuracyRubric, judge.clone())),
        Box::new(JudgedScorer::new(SummarizationRubric, judge.clone())),
        Box::new(JudgedScorer::new(ConcisenessRubric, judge)),
    ]
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One scorer's result within a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(ScoreRecord),
    Failed { error: String },
}

/// All scorer results for one run, keyed by scorer id.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub run_id: RunId,
    pub outcomes: BTreeMap<String, ScoreOutcome>,
}

impl ScoreReport {
    pub fn get(&self, scorer_id: &str) -> Option<&ScoreOutcome> {
        self.outcomes.get(scorer_id)
    }

    /// Successful scores only.
    pub fn scored(&self) -> impl Iterator<Item = (&str, &ScoreRecord)> {
        self.outcomes.iter().filter_map(|(id, o)| match o {
            ScoreOutcome::Scored(record) => Some((id.as_str(), record)),
            ScoreOutcome::Failed { .. } => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, ScoreOutcome::Failed { .. }))
            .count()
    }
}

/// Run every scorer against `run` concurrently.
///
/// A failing scorer is recorded as [`ScoreOutcome::Failed`]; it does not
/// affect the others.
#[instrument(skip_all, fields(run_id = %run.run_id, scorers = scorers.len()))]
pub async fn score_run(scorers: &[Box<dyn Scorer>], run: &AgentRun) -> ScoreReport {
    let results = join_all(scorers.iter().map(|s| async move {
        debug!(scorer = s.id(), name = s.name(), description = s.description(), "running scorer");
        let outcome = match s.score(run).await {
            Ok(record) => ScoreOutcome::Scored(record),
            Err(e) => {
                warn!(scorer = s.id(), error = %e, "scorer failed");
                ScoreOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        (s.id().to_string(), outcome)
    }))
    .await;

    let report = ScoreReport {
        run_id: run.run_id.clone(),
        outcomes: results.into_iter().collect(),
    };

    info!(failures = report.failure_count(), "scoring complete");
    report
}
