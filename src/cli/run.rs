use crate::cli::RunArgs;
use crate::config::{Config, Provider};
use crate::error::PipelineError;
use crate::output::{render_json, render_text, OutputFormat};
use crate::pipeline::Pipeline;
use crate::provider;
use std::process::ExitCode;
use tracing::{error, info};

/// Returns a failure exit code instead of exiting so the runtime shuts down
/// and drops any provider processes still in flight.
pub async fn execute(args: RunArgs) -> anyhow::Result<ExitCode> {
    // Load and validate config
    if let Some(path) = &args.config {
        info!("Loading config from {:?}", path);
    }
    let mut config = Config::load_or_default(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(model) = args.model {
        match config.provider {
            Provider::ClaudeCli => config.providers.claude_cli.model = model,
            Provider::CodexCli => config.providers.codex_cli.model = model,
        }
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_sec) = args.timeout_sec {
        config.timeout_sec = timeout_sec;
    }

    config.validate()?;

    let customer = args.customer.load()?;
    let capability = provider::from_config(&config);
    info!(
        "Processing customer {} with provider {}",
        customer.customer_id,
        capability.name()
    );

    let pipeline = Pipeline::new(capability);
    let start = std::time::Instant::now();

    match pipeline.process(customer).await {
        Ok(result) => {
            info!("Completed in {:.1}s", start.elapsed().as_secs_f64());
            let rendered = match args.format {
                OutputFormat::Text => render_text(&result),
                OutputFormat::Json => render_json(&result)?,
            };
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let PipelineError::Analysis(agg) = &e {
                error!(stages = ?agg.failed_stages(), "Analysis failed: {}", agg);
            } else {
                error!(stage = e.stage(), "Pipeline failed: {}", e);
            }
            eprintln!("Pipeline failed at {} stage: {}", e.stage(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
