//! postbrief CLI: summarize Hashnode blog posts with a language model.
//!
//! Fetches a post over the Hashnode GraphQL API, has an agent write a
//! structured summary, and optionally grades the result with scorers.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
