//! Composition root: fan-out analysis, then synthesis.

use crate::contract::HyperpersonalizedMessage;
use crate::customer::CustomerContext;
use crate::error::PipelineError;
use crate::provider::Capability;
use crate::runner::{Analyses, Orchestrator};
use crate::synthesizer::synthesize;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub customer_id: String,
    #[serde(rename = "analysis")]
    pub analyses: Analyses,
    #[serde(rename = "personalized_message")]
    pub message: HyperpersonalizedMessage,
}

pub struct Pipeline {
    orchestrator: Orchestrator,
    capability: Arc<dyn Capability>,
}

impl Pipeline {
    pub fn new(capability: Arc<dyn Capability>) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&capability)),
            capability,
        }
    }

    /// Process one customer. Each call is self-contained; concurrent calls
    /// for different customers share nothing but the capability.
    pub async fn process(&self, ctx: CustomerContext) -> Result<PipelineResult, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", customer_id = %ctx.customer_id, %run_id);

        async move {
            let ctx = Arc::new(ctx);
            info!("Processing customer {}", ctx.customer_id);

            let analyses = self.orchestrator.run_all(Arc::clone(&ctx)).await?;

            info!("Generating hyperpersonalized message");
            let message = synthesize(self.capability.as_ref(), &analyses, &ctx.display_name)
                .await
                .map_err(PipelineError::Synthesis)?;

            Ok(PipelineResult {
                customer_id: ctx.customer_id.clone(),
                analyses,
                message,
            })
        }
        .instrument(span)
        .await
    }
}
