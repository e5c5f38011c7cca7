pub mod prompt;
pub mod run;
pub mod sample;
pub mod schema;

use crate::config::Provider;
use crate::customer::CustomerContext;
use crate::error::CustomerError;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hyperpersona")]
#[command(
    author,
    version,
    about = "Parallel customer-insight agents fanned into one hyperpersonalized message"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline for one customer
    Run(RunArgs),

    /// Print the built-in sample customer as JSON
    Sample,

    /// Print a JSON Schema
    Schema(SchemaArgs),

    /// Print the prompt one analyzer would send, without calling a provider
    Prompt(PromptArgs),
}

/// Where the customer context comes from
#[derive(Args, Clone)]
pub struct CustomerArgs {
    /// Customer profile file (JSON, or YAML by extension)
    #[arg(long, conflicts_with = "sample", required_unless_present = "sample")]
    pub customer: Option<PathBuf>,

    /// Use the built-in sample customer
    #[arg(long)]
    pub sample: bool,
}

impl CustomerArgs {
    pub fn load(&self) -> Result<CustomerContext, CustomerError> {
        match &self.customer {
            Some(path) => CustomerContext::load(path),
            None => Ok(CustomerContext::sample()),
        }
    }
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, env = "HYPERPERSONA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub customer: CustomerArgs,

    /// Override provider (claude_cli, codex_cli)
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Override the provider's model
    #[arg(long)]
    pub model: Option<String>,

    /// Override max in-flight capability calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override per-call timeout in seconds
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Clone)]
pub struct SchemaArgs {
    /// Which schema to print
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Config,
    Customer,
    Financial,
    LifeMoment,
    Channel,
    Action,
    Message,
}

#[derive(Args, Clone)]
pub struct PromptArgs {
    /// Which analyzer's prompt to render
    #[arg(value_enum)]
    pub analyzer: AnalyzerKind,

    #[command(flatten)]
    pub customer: CustomerArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyzerKind {
    Financial,
    LifeMoment,
    Channel,
    Action,
}
