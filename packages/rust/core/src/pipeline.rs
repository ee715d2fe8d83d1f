//! End-to-end summary workflow: (slug, host) → fetch → summarize.
//!
//! Two steps, strictly in order. A missing post aborts the run before the
//! model is called; there is no partial output.

use std::time::Instant;

use postbrief_hashnode::{HashnodeClient, PostLocator};
use postbrief_shared::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::agent::SummaryAgent;
use crate::run::AgentRun;

/// Workflow identifier.
pub const WORKFLOW_ID: &str = "blog-summary-workflow";

/// Step 1 identifier.
pub const FETCH_STEP_ID: &str = "fetch-blog-content";

/// Step 2 identifier.
pub const SUMMARY_STEP_ID: &str = "generate-summary";

/// Workflow input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInput {
    /// The URL slug of the post.
    pub post_slug: String,
    /// The blog domain (e.g. engineering.hashnode.com).
    pub hostname: String,
}

/// Workflow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub summary: String,
}

/// Progress callback for reporting workflow status.
pub trait ProgressReporter: Send + Sync {
    /// Called when a step starts.
    fn phase(&self, name: &str);
    /// Called when the workflow completes.
    fn done(&self, output: &WorkflowOutput);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _output: &WorkflowOutput) {}
}

/// The fetch → summarize workflow.
pub struct SummaryWorkflow {
    client: HashnodeClient,
    agent: SummaryAgent,
}

impl SummaryWorkflow {
    pub fn new(client: HashnodeClient, agent: SummaryAgent) -> Self {
        Self { client, agent }
    }

    /// Run the workflow and return only its output.
    pub async fn run(
        &self,
        input: &WorkflowInput,
        progress: &dyn ProgressReporter,
    ) -> Result<WorkflowOutput> {
        self.run_with_record(input, progress)
            .await
            .map(|(output, _)| output)
    }

    /// Run the workflow, also returning the agent run for scoring.
    #[instrument(skip_all, fields(workflow = WORKFLOW_ID, host = %input.hostname, slug = %input.post_slug))]
    pub async fn run_with_record(
        &self,
        input: &WorkflowInput,
        progress: &dyn ProgressReporter,
    ) -> Result<(WorkflowOutput, AgentRun)> {
        let start = Instant::now();

        // --- Step 1: fetch (strict) ---
        progress.phase("Fetching blog post");
        info!(step = FETCH_STEP_ID, "step started");
        let locator = PostLocator::new(input.post_slug.as_str(), input.hostname.as_str())?;
        let post = self.client.fetch_post(&locator).await?;

        // --- Step 2: summarize ---
        progress.phase("Generating summary");
        info!(step = SUMMARY_STEP_ID, title = %post.title, "step started");
        let (result, run) = self.agent.summarize(&post).await?;

        let output = WorkflowOutput {
            summary: result.summary_text,
        };
        progress.done(&output);

        info!(
            run_id = %run.run_id,
            summary_chars = output.summary.chars().count(),
            elapsed_ms = start.elapsed().as_millis(),
            "workflow complete"
        );

        Ok((output, run))
    }
}
