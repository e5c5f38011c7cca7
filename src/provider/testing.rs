//! Deterministic in-process capability for tests.

use super::Capability;
use crate::contract::{Contract, FactSet, TaskDescription};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct ScriptedCapability {
    responses: HashMap<&'static str, Result<Value, String>>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<&'static str>>,
    prompts: Mutex<HashMap<&'static str, TaskDescription>>,
    facts_seen: Mutex<HashMap<&'static str, BTreeMap<String, Value>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedCapability {
    /// Valid canned answers for every contract.
    pub fn happy() -> Self {
        let responses = HashMap::from([
            ("FinancialAssessment", Ok(financial_value())),
            ("LifeMomentAssessment", Ok(life_moment_value())),
            ("ChannelAssessment", Ok(channel_value())),
            ("ActionRecommendation", Ok(action_value())),
            ("HyperpersonalizedMessage", Ok(message_value())),
        ]);
        Self {
            responses,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(HashMap::new()),
            facts_seen: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, contract: &'static str, reason: &str) -> Self {
        self.responses.insert(contract, Err(reason.to_string()));
        self
    }

    pub fn responding(mut self, contract: &'static str, value: Value) -> Self {
        self.responses.insert(contract, Ok(value));
        self
    }

    pub fn delayed(mut self, contract: &'static str, delay: Duration) -> Self {
        self.delays.insert(contract, delay);
        self
    }

    pub fn calls(&self, contract: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == contract)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn prompt_for(&self, contract: &str) -> Option<TaskDescription> {
        self.prompts.lock().unwrap().get(contract).cloned()
    }

    pub fn facts_for(&self, contract: &str) -> Option<BTreeMap<String, Value>> {
        self.facts_seen.lock().unwrap().get(contract).cloned()
    }

    pub fn task() -> TaskDescription {
        TaskDescription {
            role: "role".to_string(),
            context: "context".to_string(),
            request: "request".to_string(),
        }
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(contract.name);
        self.prompts
            .lock()
            .unwrap()
            .insert(contract.name, task.clone());

        // Call facts lazily by name, the way a tool-calling model would
        let seen: BTreeMap<String, Value> = facts
            .names()
            .filter_map(|name| facts.call(name).map(|v| (name.to_string(), v)))
            .collect();
        self.facts_seen.lock().unwrap().insert(contract.name, seen);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(contract.name) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(contract.name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(reason)) => Err(ProviderError::Rejected(reason.clone())),
            None => Err(ProviderError::Malformed(format!(
                "no scripted response for {}",
                contract.name
            ))),
        }
    }
}

pub fn financial_value() -> Value {
    json!({
        "overall_health": "good",
        "spending_pattern": "Housing and a large medical bill dominate spending",
        "savings_rate": 0.18,
        "risk_indicators": ["large medical expense"],
        "opportunities": ["emergency fund", "HSA contributions"]
    })
}

pub fn life_moment_value() -> Value {
    json!({
        "detected_moments": ["new child"],
        "confidence_score": 0.85,
        "time_sensitivity": "near-term",
        "relevant_needs": ["childcare budgeting", "life insurance"]
    })
}

pub fn channel_value() -> Value {
    json!({
        "primary_channel": "push_notification",
        "secondary_channels": ["email"],
        "best_contact_time": "weekday evenings",
        "engagement_likelihood": 0.72,
        "personalization_level": "high"
    })
}

pub fn action_value() -> Value {
    json!({
        "action_type": "financial_advice",
        "specific_recommendation": "Open a high-yield savings account for family expenses",
        "priority": "high",
        "expected_value": 1250.0,
        "rationale": "Recent medical and baby expenses suggest a need for a buffer"
    })
}

pub fn message_value() -> Value {
    json!({
        "message_subject": "Congratulations on your growing family, Jane",
        "message_body": "We noticed some big changes lately...",
        "call_to_action": "Open a family savings account",
        "tone": "friendly",
        "personalization_elements": ["new child", "medical expenses"],
        "recommended_channel": "push",
        "optimal_send_time": "Tuesday 7pm",
        "expected_engagement_rate": 0.34
    })
}
