//! CLI command definitions, routing, and tracing setup.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use postbrief_core::pipeline::{ProgressReporter, WorkflowInput, WorkflowOutput};
use postbrief_core::scorers::{ScoreOutcome, ScoreReport, Scorer, default_scorers, score_run};
use postbrief_core::tool::{BlogSummaryTool, BlogToolInput};
use postbrief_core::{AgentConfig, AgentRun, SummaryAgent, SummaryWorkflow};
use postbrief_hashnode::{HashnodeClient, PostLocator};
use postbrief_llm::{LanguageModel, OpenAiCompatModel};
use postbrief_shared::{AppConfig, init_config, load_config, resolve_api_key, validate_api_key};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// postbrief: structured summaries of Hashnode blog posts.
#[derive(Parser)]
#[command(
    name = "postbrief",
    version,
    about = "Fetch Hashnode blog posts and summarize them with a language model.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch a post and write a structured summary of it.
    Summarize {
        /// Full post URL.
        #[arg(long, conflicts_with_all = ["slug", "host"], required_unless_present = "slug")]
        url: Option<String>,

        /// Post slug (use with --host).
        #[arg(long, requires = "host")]
        slug: Option<String>,

        /// Publication host, e.g. engineering.hashnode.com (use with --slug).
        #[arg(long, requires = "slug")]
        host: Option<String>,

        /// Grade the summary with the scorers afterwards.
        #[arg(long)]
        score: bool,
    },

    /// Send one message to the summary agent; it fetches posts as needed.
    Chat {
        /// The message, e.g. "Summarize https://hashnode.com/blog/...".
        message: String,

        /// Grade the reply with the scorers afterwards.
        #[arg(long)]
        score: bool,
    },

    /// Fetch a post and print the tool output as JSON.
    Fetch {
        /// Full post URL.
        url: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "postbrief=info",
        1 => "postbrief=debug",
        _ => "postbrief=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Summarize {
            url,
            slug,
            host,
            score,
        } => cmd_summarize(url.as_deref(), slug.as_deref(), host.as_deref(), score).await,
        Command::Chat { message, score } => cmd_chat(&message, score).await,
        Command::Fetch { url } => cmd_fetch(&url).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Model clients and the fetcher, built from config.
struct Services {
    client: HashnodeClient,
    agent_model: Arc<dyn LanguageModel>,
    judge_model: Arc<dyn LanguageModel>,
    agent_config: AgentConfig,
    max_content_chars: usize,
}

impl Services {
    fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = resolve_api_key(config)?;
        let agent_model =
            OpenAiCompatModel::from_config(&config.llm, &api_key, &config.llm.agent_model)?;
        let judge_model =
            OpenAiCompatModel::from_config(&config.llm, &api_key, &config.llm.judge_model)?;

        Ok(Self {
            client: HashnodeClient::new(&config.hashnode)?,
            agent_model: Arc::new(agent_model),
            judge_model: Arc::new(judge_model),
            agent_config: AgentConfig::from_summary_config(&config.summary),
            max_content_chars: config.summary.max_content_chars,
        })
    }

    fn agent(&self) -> SummaryAgent {
        let tool = BlogSummaryTool::new(self.client.clone(), self.max_content_chars);
        SummaryAgent::new(self.agent_config.clone(), self.agent_model.clone(), tool)
    }

    async fn score(&self, run: &AgentRun, progress: &CliProgress) {
        progress.phase("Scoring run");
        let scorers = default_scorers(self.judge_model.clone());
        let report = score_run(&scorers, run).await;
        progress.finish();
        print_report(&scorers, &report);
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_summarize(
    url: Option<&str>,
    slug: Option<&str>,
    host: Option<&str>,
    score: bool,
) -> Result<()> {
    let config = load_config()?;
    let services = Services::from_config(&config)?;

    let locator = match (url, slug, host) {
        (Some(url), _, _) => PostLocator::from_url(url)?,
        (None, Some(slug), Some(host)) => PostLocator::new(slug, host)?,
        _ => return Err(eyre!("pass either --url, or both --slug and --host")),
    };

    info!(host = %locator.host, slug = %locator.slug, "summarizing post");

    let input = WorkflowInput {
        post_slug: locator.slug,
        hostname: locator.host,
    };
    let workflow = SummaryWorkflow::new(services.client.clone(), services.agent());

    let reporter = CliProgress::new();
    let (output, run) = workflow.run_with_record(&input, &reporter).await?;

    println!("{}", output.summary);

    if score {
        services.score(&run, &CliProgress::new()).await;
    }

    Ok(())
}

async fn cmd_chat(message: &str, score: bool) -> Result<()> {
    let config = load_config()?;
    let services = Services::from_config(&config)?;
    let agent = services.agent();

    info!(agent = %agent.config().id, "sending message");

    let reporter = CliProgress::new();
    reporter.phase("Thinking");
    let run = agent.generate(message).await?;
    reporter.finish();

    println!("{}", run.assistant_text().unwrap_or_default());
    if !run.tool_invocations.is_empty() {
        info!(tools = ?run.tool_names(), "tools called");
    }

    if score {
        services.score(&run, &CliProgress::new()).await;
    }

    Ok(())
}

async fn cmd_fetch(url: &str) -> Result<()> {
    let config = load_config()?;
    let client = HashnodeClient::new(&config.hashnode)?;
    let tool = BlogSummaryTool::new(client, config.summary.max_content_chars);

    let output = tool
        .execute(&BlogToolInput::Url {
            url: url.to_string(),
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");

    if let Err(e) = validate_api_key(&config) {
        eprintln!("warning: {e}");
    }
    Ok(())
}

fn print_report(scorers: &[Box<dyn Scorer>], report: &ScoreReport) {
    println!();
    println!("  Scores (run {})", report.run_id);
    for line in report_lines(scorers, report) {
        println!("  {line}");
    }
    println!();
}

/// One line per scorer, in catalogue order, labelled with the scorer's name.
fn report_lines(scorers: &[Box<dyn Scorer>], report: &ScoreReport) -> Vec<String> {
    scorers
        .iter()
        .filter_map(|s| {
            let line = match report.get(s.id())? {
                ScoreOutcome::Scored(record) => {
                    format!("{:<24} {:.2}  {}", s.name(), record.score, record.explanation)
                }
                ScoreOutcome::Failed { error } => format!("{:<24} failed: {error}", s.name()),
            };
            Some(line)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _output: &WorkflowOutput) {
        self.finish();
    }
}
