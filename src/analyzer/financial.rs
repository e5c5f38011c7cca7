use super::{format_money, Analyzer, NOT_AVAILABLE};
use crate::contract::{FactSet, FinancialAssessment};
use crate::customer::{CustomerContext, Transaction};
use crate::stage::Stage;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct Financial;

impl Analyzer for Financial {
    type Output = FinancialAssessment;

    const STAGE: Stage = Stage::Financial;

    const ROLE: &'static str = "You are an expert financial analyst specializing in consumer banking. \
        Analyze customer financial data to assess overall financial health, \
        identify spending patterns, calculate savings rates, detect risk indicators, \
        and uncover opportunities for financial improvement. \
        Provide actionable insights based on transaction history, income, and account balance.";

    const REQUEST: &'static str =
        "Analyze this customer's financial situation based on the provided data.";

    fn render(ctx: &CustomerContext) -> String {
        let credit = ctx
            .credit_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        format!(
            "Customer Context:\n\
            - Customer ID: {}\n\
            - Age: {}\n\
            - Income: {}\n\
            - Account Balance: {}\n\
            - Credit Score: {}\n\
            - Recent Transactions: {} transactions",
            ctx.customer_id,
            ctx.age,
            format_money(ctx.income),
            format_money(ctx.account_balance),
            credit,
            ctx.transactions.len()
        )
    }

    fn facts(ctx: &Arc<CustomerContext>) -> FactSet {
        let for_ratio = Arc::clone(ctx);
        let for_spending = Arc::clone(ctx);

        FactSet::new()
            .with(
                "debt_to_income_ratio",
                "monthly debt obligations divided by monthly income",
                move || json!(debt_to_income_ratio(for_ratio.monthly_debts(), for_ratio.income)),
            )
            .with(
                "spending_by_category",
                "sum of transaction amounts per category",
                move || json!(spending_by_category(&for_spending.transactions)),
            )
    }
}

/// Monthly debt over monthly income, with `annual_income` spread over twelve
/// months. Zero when there is no positive monthly income.
pub fn debt_to_income_ratio(monthly_debts: &[f64], annual_income: f64) -> f64 {
    let monthly_income = annual_income / 12.0;
    if monthly_income <= 0.0 {
        return 0.0;
    }
    monthly_debts.iter().sum::<f64>() / monthly_income
}

/// Transaction totals per category. Every category present in the input
/// appears in the output, even when its amounts cancel out.
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for txn in transactions {
        *totals.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
    }
    totals
}
