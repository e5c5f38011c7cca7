//! Capability boundary: turns a task description plus a contract into a
//! conforming value, or fails with an opaque upstream error.

mod claude;
mod codex;
mod extract;
mod limit;
mod retry;
#[cfg(test)]
pub mod testing;

pub use claude::ClaudeCliCapability;
pub use codex::CodexCliCapability;
pub use limit::ConcurrencyLimited;
pub use retry::Retrying;

use crate::config::{Config, Provider};
use crate::contract::{conform, Contract, FactSet, TaskDescription, TaskOutput};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Capability: Send + Sync {
    fn name(&self) -> &'static str;

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError>;
}

/// Invoke the capability for output type `T` and enforce its contract.
pub async fn request<T: TaskOutput>(
    capability: &dyn Capability,
    task: &TaskDescription,
    facts: &FactSet,
) -> Result<T, ProviderError> {
    let contract = Contract::of::<T>();
    let value = capability.invoke(task, &contract, facts).await?;
    conform(value)
}

/// Build the full prompt for providers that run out of process. Facts are
/// evaluated eagerly since the provider cannot call back into us.
pub(crate) fn build_prompt(task: &TaskDescription, contract: &Contract, facts: &FactSet) -> String {
    let mut prompt = task.render();

    let evaluated = facts.render_evaluated();
    if !evaluated.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&evaluated);
    }

    prompt.push_str(&format!(
        "\n\n## Output Contract: {}\n\n\
        Respond with a single JSON object that conforms to this JSON Schema. \
        Use only the enumerated values where an enum is given and keep numbers \
        within any declared range. Output the JSON object only.\n\n\
        ```json\n{}\n```",
        contract.name,
        contract.schema_text()
    ));
    prompt
}

/// Assemble the configured capability stack
pub fn from_config(config: &Config) -> Arc<dyn Capability> {
    let base: Arc<dyn Capability> = match config.provider {
        Provider::ClaudeCli => Arc::new(ClaudeCliCapability {
            binary: config.providers.claude_cli.binary.clone(),
            model: config.providers.claude_cli.model.clone(),
            permission_mode: config.providers.claude_cli.permission_mode.clone(),
            timeout: config.timeout(),
        }),
        Provider::CodexCli => Arc::new(CodexCliCapability {
            binary: config.providers.codex_cli.binary.clone(),
            model: config.providers.codex_cli.model.clone(),
            timeout: config.timeout(),
        }),
    };

    layer(base, config)
}

/// Wrap a base capability in the configured limit, and in retry only when
/// more than one attempt is allowed.
pub(crate) fn layer(base: Arc<dyn Capability>, config: &Config) -> Arc<dyn Capability> {
    let limited: Arc<dyn Capability> = Arc::new(ConcurrencyLimited::new(base, config.concurrency));

    if config.retry.max_attempts > 1 {
        Arc::new(Retrying::new(limited, config.retry.clone()))
    } else {
        limited
    }
}
