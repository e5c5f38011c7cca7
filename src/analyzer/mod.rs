//! The four insight analyzers. Each renders a deterministic context block
//! from the customer, optionally exposes pure facts, and asks the capability
//! for a value satisfying its contract.

mod channel;
mod financial;
mod life_moment;
mod next_action;

pub use channel::Channel;
pub use financial::Financial;
#[cfg(test)]
pub use financial::{debt_to_income_ratio, spending_by_category};
pub use life_moment::LifeMoment;
pub use next_action::NextBestAction;

use crate::contract::{FactSet, TaskDescription, TaskOutput};
use crate::customer::CustomerContext;
use crate::error::CapabilityError;
use crate::provider::{request, Capability};
use crate::stage::Stage;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker rendered for optional customer fields that are absent.
pub const UNKNOWN: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "Not available";
pub const NOT_SPECIFIED: &str = "Not specified";

pub trait Analyzer {
    type Output: TaskOutput + Clone + Debug;

    const STAGE: Stage;

    /// Fixed role instruction for this analyzer.
    const ROLE: &'static str;

    const REQUEST: &'static str;

    /// Context block built only from the fields this analyzer reads.
    fn render(ctx: &CustomerContext) -> String;

    fn facts(_ctx: &Arc<CustomerContext>) -> FactSet {
        FactSet::new()
    }

    fn task(ctx: &CustomerContext) -> TaskDescription {
        TaskDescription {
            role: Self::ROLE.to_string(),
            context: Self::render(ctx),
            request: Self::REQUEST.to_string(),
        }
    }
}

/// Run one analyzer against the shared context. No retry happens here.
pub async fn analyze<A: Analyzer>(
    capability: &dyn Capability,
    ctx: &Arc<CustomerContext>,
) -> Result<A::Output, CapabilityError> {
    let task = A::task(ctx);
    let facts = A::facts(ctx);
    let start = std::time::Instant::now();

    match request::<A::Output>(capability, &task, &facts).await {
        Ok(output) => {
            debug!("{} analyzer completed in {:?}", A::STAGE, start.elapsed());
            Ok(output)
        }
        Err(e) => {
            warn!("{} analyzer failed: {}", A::STAGE, e);
            Err(CapabilityError::new(A::STAGE, e.to_string()))
        }
    }
}

/// `$85,000.00` style currency.
pub(crate) fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

pub(crate) fn or_marker<'a>(value: Option<&'a str>, marker: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => marker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedCapability;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(85000.0), "$85,000.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-1200.0), "-$1,200.00");
        assert_eq!(format_money(0.0), "$0.00");
    }

    #[test]
    fn test_or_marker() {
        assert_eq!(or_marker(Some("married"), UNKNOWN), "married");
        assert_eq!(or_marker(Some("  "), UNKNOWN), UNKNOWN);
        assert_eq!(or_marker(None, NOT_AVAILABLE), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_analyze_attributes_failure_to_stage() {
        let capability = ScriptedCapability::happy().failing("ChannelAssessment", "upstream timeout");
        let ctx = Arc::new(CustomerContext::sample());

        let err = analyze::<Channel>(&capability, &ctx).await.unwrap_err();
        assert_eq!(err.stage, Stage::Channel);
        assert!(err.reason.contains("upstream timeout"));
        assert_eq!(capability.calls("ChannelAssessment"), 1);
    }

    #[tokio::test]
    async fn test_analyze_reports_contract_violation() {
        let capability = ScriptedCapability::happy().responding(
            "LifeMomentAssessment",
            serde_json::json!({
                "detected_moments": [],
                "confidence_score": 3.0,
                "time_sensitivity": "immediate",
                "relevant_needs": []
            }),
        );
        let ctx = Arc::new(CustomerContext::sample());

        let err = analyze::<LifeMoment>(&capability, &ctx).await.unwrap_err();
        assert_eq!(err.stage, Stage::LifeMoment);
        assert!(err.reason.contains("confidence_score"));
    }
}
