use super::{or_marker, Analyzer, UNKNOWN};
use crate::contract::LifeMomentAssessment;
use crate::customer::CustomerContext;
use crate::stage::Stage;

pub struct LifeMoment;

impl Analyzer for LifeMoment {
    type Output = LifeMomentAssessment;

    const STAGE: Stage = Stage::LifeMoment;

    const ROLE: &'static str = "You are an expert in customer lifecycle analysis. \
        Identify significant life moments and transitions based on financial behavior, \
        demographic information, and transaction patterns. \
        Life moments include: career changes, relocation, marriage, new child, \
        home purchase, retirement planning, education expenses, etc. \
        Assess confidence and time sensitivity for each detected moment.";

    const REQUEST: &'static str =
        "Identify any significant life moments or transitions for this customer.";

    fn render(ctx: &CustomerContext) -> String {
        let categories = ctx.transaction_categories();
        let categories = if categories.is_empty() {
            "None".to_string()
        } else {
            categories.into_iter().collect::<Vec<_>>().join(", ")
        };

        format!(
            "Customer Life Context:\n\
            - Age: {}\n\
            - Marital Status: {}\n\
            - Has Children: {}\n\
            - Employment: {}\n\
            - Location: {}\n\
            - Transaction Categories: {}",
            ctx.age,
            or_marker(ctx.marital_status.as_deref(), UNKNOWN),
            if ctx.has_children { "yes" } else { "no" },
            or_marker(ctx.employment_status.as_deref(), UNKNOWN),
            ctx.location,
            categories
        )
    }
}
