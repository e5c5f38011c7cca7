//! Fan-in stage: turns the four analyses into the final message.

use crate::contract::{FactSet, HyperpersonalizedMessage, TaskDescription};
use crate::error::CapabilityError;
use crate::provider::{request, Capability};
use crate::runner::Analyses;
use crate::stage::Stage;
use tracing::{debug, warn};

const ROLE: &str = "You are an expert in customer communication and personalization. \
    Given insights about a customer's financial situation, life moments, \
    channel preferences, and recommended actions, craft a highly personalized \
    message that resonates with their specific context and needs. \
    The message should be relevant, timely, empathetic, and include a clear call-to-action. \
    Adapt tone and style based on the customer profile and recommended channel.";

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Build the synthesis brief from the joined analyses.
pub fn render_brief(analyses: &Analyses, display_name: &str) -> TaskDescription {
    let Analyses {
        financial,
        life_moment,
        channel,
        action,
    } = analyses;

    let context = format!(
        "Generate a hyperpersonalized message for {} based on the following insights:\n\n\
        FINANCIAL SITUATION:\n\
        - Overall Health: {}\n\
        - Spending Pattern: {}\n\
        - Opportunities: {}\n\n\
        LIFE MOMENTS:\n\
        - Detected Moments: {}\n\
        - Time Sensitivity: {}\n\
        - Relevant Needs: {}\n\n\
        CHANNEL PREFERENCES:\n\
        - Primary Channel: {}\n\
        - Best Contact Time: {}\n\
        - Personalization Level: {}\n\n\
        RECOMMENDED ACTION:\n\
        - Action Type: {}\n\
        - Recommendation: {}\n\
        - Priority: {}\n\
        - Rationale: {}",
        display_name,
        financial.overall_health,
        financial.spending_pattern,
        join_or_none(&financial.opportunities),
        join_or_none(&life_moment.detected_moments),
        life_moment.time_sensitivity,
        join_or_none(&life_moment.relevant_needs),
        channel.primary_channel,
        channel.best_contact_time,
        channel.personalization_level,
        action.action_type,
        action.recommendation,
        action.priority,
        action.rationale,
    );

    let instructions = format!(
        "Create a message that:\n\
        1. Acknowledges their current situation\n\
        2. Addresses their life moment if applicable\n\
        3. Presents the recommended action naturally\n\
        4. Includes a compelling call-to-action\n\
        5. Uses appropriate tone for the {} channel\n\n\
        Set recommended_channel to the primary channel above unless you have a strong reason not to.",
        channel.primary_channel
    );

    TaskDescription {
        role: ROLE.to_string(),
        context,
        request: instructions,
    }
}

/// Single capability call; no retry and no templated fallback.
pub async fn synthesize(
    capability: &dyn Capability,
    analyses: &Analyses,
    display_name: &str,
) -> Result<HyperpersonalizedMessage, CapabilityError> {
    let task = render_brief(analyses, display_name);
    let start = std::time::Instant::now();

    let message = request::<HyperpersonalizedMessage>(capability, &task, &FactSet::new())
        .await
        .map_err(|e| {
            warn!("Synthesis failed: {}", e);
            CapabilityError::new(Stage::Synthesizer, e.to_string())
        })?;

    debug!("Synthesis completed in {:?}", start.elapsed());

    let primary = analyses.channel.primary_channel.as_str();
    if !message.recommended_channel.eq_ignore_ascii_case(primary) {
        warn!(
            "Recommended channel '{}' differs from analyzed primary channel '{}'",
            message.recommended_channel, primary
        );
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{conform, Tone};
    use crate::provider::testing::{
        action_value, channel_value, financial_value, life_moment_value, ScriptedCapability,
    };

    fn analyses() -> Analyses {
        Analyses {
            financial: conform(financial_value()).unwrap(),
            life_moment: conform(life_moment_value()).unwrap(),
            channel: conform(channel_value()).unwrap(),
            action: conform(action_value()).unwrap(),
        }
    }

    #[test]
    fn test_brief_surfaces_every_insight() {
        let task = render_brief(&analyses(), "Jane Doe");
        let text = task.render();

        for needle in [
            "Jane Doe",
            "- Overall Health: good",
            "- Spending Pattern: Housing and a large medical bill",
            "- Opportunities: emergency fund, HSA contributions",
            "- Detected Moments: new child",
            "- Time Sensitivity: near-term",
            "- Relevant Needs: childcare budgeting, life insurance",
            "- Primary Channel: push",
            "- Best Contact Time: weekday evenings",
            "- Personalization Level: high",
            "- Action Type: financial_advice",
            "- Recommendation: Open a high-yield savings account",
            "- Priority: high",
            "- Rationale: Recent medical and baby expenses",
            "1. Acknowledges their current situation",
            "2. Addresses their life moment if applicable",
            "3. Presents the recommended action naturally",
            "4. Includes a compelling call-to-action",
            "5. Uses appropriate tone for the push channel",
        ] {
            assert!(text.contains(needle), "brief missing: {}", needle);
        }
    }

    #[test]
    fn test_brief_marks_no_life_moments() {
        let mut input = analyses();
        input.life_moment.detected_moments.clear();
        let task = render_brief(&input, "Jane Doe");
        assert!(task.context.contains("- Detected Moments: None"));
    }

    #[tokio::test]
    async fn test_synthesize_returns_message() {
        let capability = ScriptedCapability::happy();
        let message = synthesize(&capability, &analyses(), "Jane Doe").await.unwrap();
        assert_eq!(message.tone, Tone::Friendly);
        assert_eq!(capability.calls("HyperpersonalizedMessage"), 1);
    }

    #[tokio::test]
    async fn test_synthesize_failure_has_no_fallback() {
        let capability =
            ScriptedCapability::happy().failing("HyperpersonalizedMessage", "model overloaded");
        let err = synthesize(&capability, &analyses(), "Jane Doe")
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Synthesizer);
        assert!(err.reason.contains("model overloaded"));
        assert_eq!(capability.calls("HyperpersonalizedMessage"), 1);
    }
}
