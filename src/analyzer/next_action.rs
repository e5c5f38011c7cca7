use super::{format_money, Analyzer, NOT_AVAILABLE};
use crate::contract::ActionRecommendation;
use crate::customer::CustomerContext;
use crate::stage::Stage;

pub struct NextBestAction;

impl Analyzer for NextBestAction {
    type Output = ActionRecommendation;

    const STAGE: Stage = Stage::NextBestAction;

    const ROLE: &'static str = "You are a banking product specialist and relationship manager. \
        Based on customer financial situation and needs, recommend the most \
        appropriate next best action or offer. Consider products like: \
        savings accounts, credit cards, loans, investment products, \
        insurance, or financial advisory services. \
        Prioritize recommendations that provide genuine customer value.";

    const REQUEST: &'static str = "Recommend the next best action or offer for this customer.";

    fn render(ctx: &CustomerContext) -> String {
        let credit = ctx
            .credit_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        format!(
            "Customer Financial Profile:\n\
            - Income: {}\n\
            - Account Balance: {}\n\
            - Credit Score: {}\n\
            - Age: {}",
            format_money(ctx.income),
            format_money(ctx.account_balance),
            credit,
            ctx.age
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sample() {
        let block = NextBestAction::render(&CustomerContext::sample());
        assert!(block.contains("- Income: $85,000.00"));
        assert!(block.contains("- Account Balance: $15,000.00"));
        assert!(block.contains("- Credit Score: 720"));
        assert!(block.contains("- Age: 32"));
    }

    #[test]
    fn test_render_reads_only_financial_fields() {
        let mut ctx = CustomerContext::sample();
        ctx.location = "Somewhere Else".to_string();
        ctx.marital_status = None;
        assert_eq!(
            NextBestAction::render(&ctx),
            NextBestAction::render(&CustomerContext::sample())
        );
    }
}
