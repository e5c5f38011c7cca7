use crate::analyzer::{Analyzer, Channel, Financial, LifeMoment, NextBestAction};
use crate::cli::{AnalyzerKind, PromptArgs};
use crate::contract::Contract;
use crate::customer::CustomerContext;
use crate::provider::build_prompt;
use std::sync::Arc;

pub fn execute(args: PromptArgs) -> anyhow::Result<()> {
    let ctx = Arc::new(args.customer.load()?);

    let prompt = match args.analyzer {
        AnalyzerKind::Financial => render::<Financial>(&ctx),
        AnalyzerKind::LifeMoment => render::<LifeMoment>(&ctx),
        AnalyzerKind::Channel => render::<Channel>(&ctx),
        AnalyzerKind::Action => render::<NextBestAction>(&ctx),
    };

    println!("{}", prompt);
    Ok(())
}

/// The prompt exactly as an out-of-process provider would receive it
fn render<A: Analyzer>(ctx: &Arc<CustomerContext>) -> String {
    build_prompt(&A::task(ctx), &Contract::of::<A::Output>(), &A::facts(ctx))
}
