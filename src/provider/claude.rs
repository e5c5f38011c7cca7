use super::extract::parse_output;
use super::{build_prompt, Capability};
use crate::contract::{Contract, FactSet, TaskDescription};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

pub struct ClaudeCliCapability {
    pub binary: PathBuf,
    pub model: String,
    pub permission_mode: String,
    pub timeout: Duration,
}

#[async_trait]
impl Capability for ClaudeCliCapability {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError> {
        let prompt = build_prompt(task, contract, facts);

        // Build command - use string for PATH lookup if not an absolute/relative path
        let binary_str = self.binary.to_string_lossy();
        let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
            Command::new(&self.binary)
        } else {
            Command::new(binary_str.as_ref())
        };

        cmd.arg("-p")
            .arg(&prompt)
            .arg("--model")
            .arg(&self.model)
            .arg("--output-format")
            .arg("json")
            .arg("--permission-mode")
            .arg(&self.permission_mode);

        // Abandoned calls must not leave the CLI running
        cmd.kill_on_drop(true);

        let start = std::time::Instant::now();

        let output = tokio_timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(ProviderError::Io)?;

        debug!(
            "claude_cli answered {} in {:?}",
            contract.name,
            start.elapsed()
        );

        if !output.status.success() {
            return Err(ProviderError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}
