use super::Capability;
use crate::contract::{Contract, FactSet, TaskDescription};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Caps the number of in-flight calls across every stage and pipeline run
/// sharing this capability.
pub struct ConcurrencyLimited {
    inner: Arc<dyn Capability>,
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyLimited {
    pub fn new(inner: Arc<dyn Capability>, limit: usize) -> Self {
        Self {
            inner,
            semaphore: Arc::new(Semaphore::new(limit.max(1))),
        }
    }
}

#[async_trait]
impl Capability for ConcurrencyLimited {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ProviderError::Rejected(format!("capability limiter closed: {}", e)))?;
        self.inner.invoke(task, contract, facts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::FinancialAssessment;
    use crate::provider::testing::ScriptedCapability;
    use std::time::Duration;

    #[tokio::test]
    async fn test_limit_serializes_calls() {
        let scripted = Arc::new(
            ScriptedCapability::happy().delayed("FinancialAssessment", Duration::from_millis(20)),
        );
        let limited = Arc::new(ConcurrencyLimited::new(scripted.clone(), 1));
        let task = ScriptedCapability::task();
        let contract = Contract::of::<FinancialAssessment>();
        let facts = FactSet::new();

        let (a, b) = tokio::join!(
            limited.invoke(&task, &contract, &facts),
            limited.invoke(&task, &contract, &facts)
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(scripted.calls("FinancialAssessment"), 2);
        assert_eq!(scripted.max_in_flight(), 1);
    }
}
