use super::{Analyzer, NOT_SPECIFIED};
use crate::contract::ChannelAssessment;
use crate::customer::CustomerContext;
use crate::stage::Stage;

pub struct Channel;

impl Analyzer for Channel {
    type Output = ChannelAssessment;

    const STAGE: Stage = Stage::Channel;

    const ROLE: &'static str = "You are a customer engagement specialist. \
        Analyze customer digital behavior and preferences to determine \
        the most effective communication channels and optimal contact times. \
        Consider engagement history, demographic factors, and behavioral patterns.";

    const REQUEST: &'static str =
        "Determine the best communication channels and timing for this customer.";

    fn render(ctx: &CustomerContext) -> String {
        let contact_times = if ctx.preferred_contact_times.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            ctx.preferred_contact_times
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let engagement = if ctx.engagement.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            ctx.engagement
                .iter()
                .map(|(metric, value)| format!("{}={}", metric, value))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Customer Engagement Profile:\n\
            - Age: {}\n\
            - Location: {}\n\
            - Preferred Contact Times: {}\n\
            - Digital Engagement: {}",
            ctx.age, ctx.location, contact_times, engagement
        )
    }
}
