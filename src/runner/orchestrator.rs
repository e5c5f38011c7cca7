use crate::analyzer::{analyze, Analyzer, Channel, Financial, LifeMoment, NextBestAction};
use crate::contract::{
    ActionRecommendation, ChannelAssessment, FinancialAssessment, LifeMomentAssessment,
};
use crate::customer::CustomerContext;
use crate::error::{AggregateAnalysisError, CapabilityError};
use crate::provider::Capability;
use crate::stage::Stage;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, info_span, warn, Instrument};

/// The four analyzer outputs, one field per variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analyses {
    #[serde(rename = "financial_situation")]
    pub financial: FinancialAssessment,
    pub life_moment: LifeMomentAssessment,
    #[serde(rename = "channel_preference")]
    pub channel: ChannelAssessment,
    #[serde(rename = "next_best_action")]
    pub action: ActionRecommendation,
}

enum Outcome {
    Financial(FinancialAssessment),
    LifeMoment(LifeMomentAssessment),
    Channel(ChannelAssessment),
    NextBestAction(ActionRecommendation),
}

type Branch = BoxFuture<'static, (Stage, Result<Result<Outcome, CapabilityError>, JoinError>)>;

/// Runs the four analyzers concurrently over one shared context.
pub struct Orchestrator {
    capability: Arc<dyn Capability>,
}

impl Orchestrator {
    pub fn new(capability: Arc<dyn Capability>) -> Self {
        Self { capability }
    }

    /// All-or-nothing fan-out. The first failure observed is returned at once;
    /// siblings still in flight are left to finish and their results dropped.
    pub async fn run_all(
        &self,
        ctx: Arc<CustomerContext>,
    ) -> Result<Analyses, AggregateAnalysisError> {
        let start = std::time::Instant::now();

        let mut branches: FuturesUnordered<Branch> = FuturesUnordered::new();
        branches.push(self.spawn::<Financial>(&ctx, Outcome::Financial));
        branches.push(self.spawn::<LifeMoment>(&ctx, Outcome::LifeMoment));
        branches.push(self.spawn::<Channel>(&ctx, Outcome::Channel));
        branches.push(self.spawn::<NextBestAction>(&ctx, Outcome::NextBestAction));

        let mut financial = None;
        let mut life_moment = None;
        let mut channel = None;
        let mut action = None;

        while let Some((stage, joined)) = branches.next().await {
            let failure = match joined {
                Ok(Ok(outcome)) => {
                    info!("{} analysis completed", stage);
                    match outcome {
                        Outcome::Financial(v) => financial = Some(v),
                        Outcome::LifeMoment(v) => life_moment = Some(v),
                        Outcome::Channel(v) => channel = Some(v),
                        Outcome::NextBestAction(v) => action = Some(v),
                    }
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => CapabilityError::new(stage, format!("analyzer task aborted: {}", e)),
            };

            warn!(
                "{} analysis failed, abandoning {} in-flight sibling(s): {}",
                stage,
                branches.len(),
                failure.reason
            );
            return Err(AggregateAnalysisError {
                failures: vec![failure],
            });
        }

        match (financial, life_moment, channel, action) {
            (Some(financial), Some(life_moment), Some(channel), Some(action)) => {
                info!("Parallel analysis complete in {:?}", start.elapsed());
                Ok(Analyses {
                    financial,
                    life_moment,
                    channel,
                    action,
                })
            }
            (financial, life_moment, channel, action) => {
                let present = [
                    financial.is_some(),
                    life_moment.is_some(),
                    channel.is_some(),
                    action.is_some(),
                ];
                let failures = Stage::ANALYZERS
                    .iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(stage, _)| CapabilityError::new(*stage, "analyzer produced no result"))
                    .collect();
                Err(AggregateAnalysisError { failures })
            }
        }
    }

    fn spawn<A>(&self, ctx: &Arc<CustomerContext>, wrap: fn(A::Output) -> Outcome) -> Branch
    where
        A: Analyzer + 'static,
    {
        let capability = Arc::clone(&self.capability);
        let ctx = Arc::clone(ctx);
        let span = info_span!("analyzer", stage = %A::STAGE);

        let handle = tokio::spawn(
            async move { analyze::<A>(capability.as_ref(), &ctx).await.map(wrap) }
                .instrument(span),
        );

        async move { (A::STAGE, handle.await) }.boxed()
    }
}
