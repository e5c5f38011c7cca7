//! Customer context: the immutable snapshot every analyzer reads.

use crate::error::CustomerError;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Transaction {
    pub amount: f64,
    pub category: String,
    #[serde(alias = "date", deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub merchant: Option<String>,
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Engagement metrics are either counts/rates or on/off flags.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum EngagementValue {
    Flag(bool),
    Number(f64),
}

impl std::fmt::Display for EngagementValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngagementValue::Flag(b) => write!(f, "{}", b),
            EngagementValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct CustomerContext {
    pub customer_id: String,

    #[serde(alias = "customer_name")]
    pub display_name: String,

    pub age: u32,

    /// Annual income.
    pub income: f64,

    pub account_balance: f64,

    #[serde(default)]
    pub credit_score: Option<u32>,

    #[serde(default, alias = "recent_transactions")]
    pub transactions: Vec<Transaction>,

    pub location: String,

    #[serde(default)]
    pub marital_status: Option<String>,

    #[serde(default)]
    pub employment_status: Option<String>,

    #[serde(default)]
    pub has_children: bool,

    #[serde(default)]
    pub preferred_contact_times: BTreeSet<String>,

    #[serde(default, alias = "digital_engagement")]
    pub engagement: BTreeMap<String, EngagementValue>,

    /// Numeric account facts, e.g. `debts` holds recurring monthly obligations.
    #[serde(default, alias = "account_data")]
    pub account_facts: BTreeMap<String, Vec<f64>>,
}

impl CustomerContext {
    /// Load a customer from a JSON or YAML file (chosen by extension).
    pub fn load(path: &Path) -> Result<Self, CustomerError> {
        let content = std::fs::read_to_string(path).map_err(|e| CustomerError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// Monthly debt obligations recorded under the `debts` account fact.
    pub fn monthly_debts(&self) -> &[f64] {
        self.account_facts
            .get("debts")
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct transaction categories, sorted.
    pub fn transaction_categories(&self) -> BTreeSet<&str> {
        self.transactions
            .iter()
            .map(|t| t.category.as_str())
            .collect()
    }

    /// Demo customer: a young family facing a large medical bill.
    pub fn sample() -> Self {
        let now = Utc::now();
        let txn = |amount: f64, category: &str, days: i64, merchant: &str| Transaction {
            amount,
            category: category.to_string(),
            timestamp: now - Duration::days(days),
            merchant: Some(merchant.to_string()),
        };

        Self {
            customer_id: "CUST_12345".to_string(),
            display_name: "Jane Doe".to_string(),
            age: 32,
            income: 85000.0,
            account_balance: 15000.0,
            credit_score: Some(720),
            transactions: vec![
                txn(1200.0, "rent", 5, "Property Management"),
                txn(450.0, "baby_supplies", 10, "Baby Store"),
                txn(2800.0, "medical", 15, "Hospital"),
            ],
            location: "San Francisco, CA".to_string(),
            marital_status: Some("married".to_string()),
            employment_status: Some("employed".to_string()),
            has_children: true,
            preferred_contact_times: ["evening", "weekend"]
                .into_iter()
                .map(String::from)
                .collect(),
            engagement: BTreeMap::from([
                (
                    "mobile_app_sessions_per_week".to_string(),
                    EngagementValue::Number(12.0),
                ),
                ("email_open_rate".to_string(), EngagementValue::Number(0.65)),
                (
                    "push_notification_enabled".to_string(),
                    EngagementValue::Flag(true),
                ),
            ]),
            account_facts: BTreeMap::from([("debts".to_string(), vec![1200.0, 800.0])]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_original_field_names_from_json() {
        let json = r#"{
            "customer_id": "C1",
            "customer_name": "Sam",
            "age": 40,
            "income": 50000,
            "account_balance": 100,
            "recent_transactions": [
                {"amount": 12.5, "category": "food", "date": "2024-05-01T10:00:00Z"}
            ],
            "location": "Austin, TX",
            "digital_engagement": {"email_open_rate": 0.4, "push_enabled": false},
            "account_data": {"debts": [300, 200]}
        }"#;
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let ctx = CustomerContext::load(file.path()).unwrap();
        assert_eq!(ctx.display_name, "Sam");
        assert_eq!(ctx.transactions.len(), 1);
        assert_eq!(ctx.credit_score, None);
        assert_eq!(ctx.monthly_debts(), &[300.0, 200.0]);
        assert_eq!(
            ctx.engagement.get("push_enabled"),
            Some(&EngagementValue::Flag(false))
        );
    }

    #[test]
    fn test_load_naive_transaction_dates() {
        let json = r#"{
            "customer_id": "C3",
            "customer_name": "Ana",
            "age": 29,
            "income": 64000,
            "account_balance": 900,
            "recent_transactions": [
                {"amount": 40.0, "category": "food", "date": "2025-01-05T10:00:00.123456"},
                {"amount": 15.0, "category": "transport", "date": "2025-01-06 08:30:00"}
            ],
            "location": "Denver, CO"
        }"#;
        let ctx: CustomerContext = serde_json::from_str(json).unwrap();

        assert_eq!(
            ctx.transactions[0].timestamp.to_rfc3339(),
            "2025-01-05T10:00:00.123456+00:00"
        );
        assert_eq!(
            ctx.transactions[1].timestamp.to_rfc3339(),
            "2025-01-06T08:30:00+00:00"
        );

        let bad = json.replace("2025-01-06 08:30:00", "yesterday");
        let err = serde_json::from_str::<CustomerContext>(&bad).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn test_load_yaml() {
        let yaml = "customer_id: C2\ndisplay_name: Lee\nage: 25\nincome: 0\naccount_balance: 0\nlocation: Nowhere\n";
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let ctx = CustomerContext::load(file.path()).unwrap();
        assert_eq!(ctx.customer_id, "C2");
        assert!(ctx.transactions.is_empty());
        assert!(ctx.monthly_debts().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CustomerContext::load(Path::new("/nonexistent/customer.json")).unwrap_err();
        assert!(matches!(err, CustomerError::ReadFile { .. }));
    }

    #[test]
    fn test_sample_roundtrips_through_json() {
        let sample = CustomerContext::sample();
        let json = serde_json::to_string(&sample).unwrap();
        let back: CustomerContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
        assert_eq!(
            sample.transaction_categories().into_iter().collect::<Vec<_>>(),
            vec!["baby_supplies", "medical", "rent"]
        );
    }
}
