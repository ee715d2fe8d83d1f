//! Core domain logic for postbrief.
//!
//! Ties the Hashnode fetcher and the model client together into the
//! summary agent, the fetch → summarize workflow, and the scorers that
//! grade finished runs.

pub mod agent;
pub mod pipeline;
pub mod run;
pub mod scorers;
pub mod tool;

pub use agent::{AgentConfig, SummaryAgent, build_summary_prompt, truncate_content};
pub use pipeline::{
    ProgressReporter, SilentProgress, SummaryWorkflow, WorkflowInput, WorkflowOutput,
};
pub use run::{AgentRun, ToolInvocation};
pub use scorers::{ScoreOutcome, ScoreReport, Scorer, default_scorers, score_run};
pub use tool::{BlogSummaryTool, BlogToolInput, BlogToolOutput};
