use crate::error::OutputError;
use crate::pipeline::PipelineResult;

const RULE: &str = "============================================================";

/// Human-readable report: the intermediate analysis, then the final message.
pub fn render_text(result: &PipelineResult) -> String {
    let analyses = &result.analyses;
    let message = &result.message;
    let mut content = String::new();

    content.push_str(&format!("Customer: {}\n{}\n\n", result.customer_id, RULE));

    content.push_str("Analysis Results:\n");
    content.push_str(&format!(
        "  Financial Health: {}\n",
        analyses.financial.overall_health
    ));
    let moments = if analyses.life_moment.detected_moments.is_empty() {
        "None detected".to_string()
    } else {
        analyses.life_moment.detected_moments.join(", ")
    };
    content.push_str(&format!("  Life Moments: {}\n", moments));
    content.push_str(&format!(
        "  Best Channel: {}\n",
        analyses.channel.primary_channel
    ));
    content.push_str(&format!(
        "  Recommendation: {}\n",
        analyses.action.recommendation
    ));

    content.push_str(&format!("\n{}\nFINAL PERSONALIZED MESSAGE\n{}\n\n", RULE, RULE));
    content.push_str(&format!("Channel: {}\n", message.recommended_channel));
    content.push_str(&format!("Subject: {}\n\n", message.subject));
    content.push_str(&format!("{}\n\n", message.body));
    content.push_str(&format!("Call to Action: {}\n\n", message.call_to_action));
    content.push_str(&format!("Optimal Send Time: {}\n", message.optimal_send_time));
    content.push_str(&format!(
        "Expected Engagement: {:.1}%\n",
        message.expected_engagement_rate * 100.0
    ));

    content
}

pub fn render_json(result: &PipelineResult) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(result)?)
}
