//! Output shapes for the four analyzers and the synthesizer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{unit_interval, TaskOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl OverallHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallHealth::Excellent => "excellent",
            OverallHealth::Good => "good",
            OverallHealth::Fair => "fair",
            OverallHealth::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSensitivity {
    Immediate,
    NearTerm,
    MediumTerm,
    LongTerm,
}

impl TimeSensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSensitivity::Immediate => "immediate",
            TimeSensitivity::NearTerm => "near-term",
            TimeSensitivity::MediumTerm => "medium-term",
            TimeSensitivity::LongTerm => "long-term",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Email,
    Sms,
    #[serde(alias = "push_notification")]
    Push,
    Phone,
    InApp,
}

impl ContactChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactChannel::Email => "email",
            ContactChannel::Sms => "sms",
            ContactChannel::Push => "push",
            ContactChannel::Phone => "phone",
            ContactChannel::InApp => "in_app",
        }
    }
}

/// Shared high/medium/low scale for personalization level and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ProductOffer,
    ServiceUpgrade,
    FinancialAdvice,
    Engagement,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ProductOffer => "product_offer",
            ActionType::ServiceUpgrade => "service_upgrade",
            ActionType::FinancialAdvice => "financial_advice",
            ActionType::Engagement => "engagement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Urgent,
    Educational,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Urgent => "urgent",
            Tone::Educational => "educational",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(OverallHealth, TimeSensitivity, ContactChannel, Level, ActionType, Tone);

/// Financial health assessment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FinancialAssessment {
    pub overall_health: OverallHealth,

    /// Description of spending behavior
    pub spending_pattern: String,

    /// Estimated monthly savings rate
    pub savings_rate: f64,

    /// Financial risk factors
    pub risk_indicators: Vec<String>,

    /// Financial improvement opportunities
    pub opportunities: Vec<String>,
}

impl TaskOutput for FinancialAssessment {
    const CONTRACT: &'static str = "FinancialAssessment";

    fn check(&self) -> Result<(), String> {
        if !self.savings_rate.is_finite() {
            return Err("savings_rate must be a finite number".to_string());
        }
        Ok(())
    }
}

/// Life events or transitions detected from behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct LifeMomentAssessment {
    /// Identified life events or transitions
    pub detected_moments: Vec<String>,

    /// Confidence in detection
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence_score: f64,

    pub time_sensitivity: TimeSensitivity,

    /// Needs arising from life moments
    pub relevant_needs: Vec<String>,
}

impl TaskOutput for LifeMomentAssessment {
    const CONTRACT: &'static str = "LifeMomentAssessment";

    fn check(&self) -> Result<(), String> {
        unit_interval("confidence_score", self.confidence_score)
    }
}

/// Communication channel analysis.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ChannelAssessment {
    pub primary_channel: ContactChannel,

    pub secondary_channels: Vec<String>,

    pub best_contact_time: String,

    #[schemars(range(min = 0.0, max = 1.0))]
    pub engagement_likelihood: f64,

    pub personalization_level: Level,
}

impl TaskOutput for ChannelAssessment {
    const CONTRACT: &'static str = "ChannelAssessment";

    fn check(&self) -> Result<(), String> {
        unit_interval("engagement_likelihood", self.engagement_likelihood)
    }
}

/// Recommended next best action or offer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ActionRecommendation {
    pub action_type: ActionType,

    #[serde(alias = "specific_recommendation")]
    pub recommendation: String,

    pub priority: Level,

    /// Expected customer lifetime value impact
    pub expected_value: f64,

    pub rationale: String,
}

impl TaskOutput for ActionRecommendation {
    const CONTRACT: &'static str = "ActionRecommendation";

    fn check(&self) -> Result<(), String> {
        if !self.expected_value.is_finite() {
            return Err("expected_value must be a finite number".to_string());
        }
        Ok(())
    }
}

/// The final synthesized message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct HyperpersonalizedMessage {
    #[serde(alias = "message_subject")]
    pub subject: String,

    #[serde(alias = "message_body")]
    pub body: String,

    pub call_to_action: String,

    pub tone: Tone,

    pub personalization_elements: Vec<String>,

    /// Free text; expected to echo the analyzed primary channel
    pub recommended_channel: String,

    pub optimal_send_time: String,

    /// Fraction of recipients expected to engage
    #[schemars(range(min = 0.0, max = 1.0))]
    pub expected_engagement_rate: f64,
}

impl TaskOutput for HyperpersonalizedMessage {
    const CONTRACT: &'static str = "HyperpersonalizedMessage";

    fn check(&self) -> Result<(), String> {
        unit_interval("expected_engagement_rate", self.expected_engagement_rate)
    }
}
