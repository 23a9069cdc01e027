//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for tax-counsel
#[derive(Parser, Debug)]
#[command(name = "tax-counsel")]
#[command(author, version, about = "Multi-specialist tax analysis orchestrator")]
#[command(long_about = r#"
tax-counsel routes a tax question through a panel of domain specialists.

The process has three phases:
1. Planning: the orchestrator decides which specialists to consult
2. Fan-out: all selected specialists are consulted in parallel
3. Synthesis: the orchestrator integrates their answers into one analysis

Progress is streamed to stdout as NDJSON, one event per line.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./counsel.toml      Project-level config
3. ~/.config/tax-counsel/config.toml   Global config

Example:
  tax-counsel "Should this LLC elect S-corp status?"
  tax-counsel --matter-context matter.md "What is the basis impact?"
  tax-counsel --specialist partnership "How does section 751 apply here?"
"#)]
pub struct Cli {
    /// The tax question to analyze
    pub question: String,

    /// Consult one specialist directly, skipping orchestration
    #[arg(short, long, value_name = "ID")]
    pub specialist: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// File with matter/client background to include in prompts
    #[arg(long, value_name = "PATH")]
    pub matter_context: Option<PathBuf>,

    /// File with document summaries to include in prompts
    #[arg(long, value_name = "PATH")]
    pub document_context: Option<PathBuf>,

    /// JSON file with prior conversation turns
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Write the composed message here on success
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
