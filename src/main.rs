use clap::Parser;
use std::process::ExitCode;

mod analyzer;
mod cli;
mod config;
mod contract;
mod customer;
mod error;
mod output;
mod pipeline;
mod provider;
mod runner;
mod stage;
mod synthesizer;
mod telemetry;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    telemetry::init(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Sample => cli::sample::execute().map(|_| ExitCode::SUCCESS),
        Commands::Schema(args) => cli::schema::execute(args).map(|_| ExitCode::SUCCESS),
        Commands::Prompt(args) => cli::prompt::execute(args).map(|_| ExitCode::SUCCESS),
    }
}
