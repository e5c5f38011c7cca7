use super::extract::parse_output;
use super::{build_prompt, Capability};
use crate::contract::{Contract, FactSet, TaskDescription};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

pub struct CodexCliCapability {
    pub binary: PathBuf,
    pub model: String,
    pub timeout: Duration,
}

#[async_trait]
impl Capability for CodexCliCapability {
    fn name(&self) -> &'static str {
        "codex_cli"
    }

    async fn invoke(
        &self,
        task: &TaskDescription,
        contract: &Contract,
        facts: &FactSet,
    ) -> Result<Value, ProviderError> {
        let prompt = build_prompt(task, contract, facts);

        // Final assistant message lands here; stdout carries JSONL events
        let out_file = NamedTempFile::new().map_err(ProviderError::Io)?;

        let binary_str = self.binary.to_string_lossy();
        let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
            Command::new(&self.binary)
        } else {
            Command::new(binary_str.as_ref())
        };

        cmd.arg("exec")
            .arg("--model")
            .arg(&self.model)
            .arg("--json")
            .arg("--output-last-message")
            .arg(out_file.path())
            // Read prompt from stdin
            .arg("-");

        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        cmd.kill_on_drop(true);

        let start = std::time::Instant::now();

        let mut child = cmd.spawn().map_err(ProviderError::Io)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(ProviderError::Io)?;
            stdin.shutdown().await.map_err(ProviderError::Io)?;
        }

        let output = tokio_timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(ProviderError::Io)?;

        debug!(
            "codex_cli answered {} in {:?}",
            contract.name,
            start.elapsed()
        );

        if !output.status.success() {
            return Err(ProviderError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let last_message = tokio::fs::read_to_string(out_file.path())
            .await
            .map_err(ProviderError::Io)?;

        parse_output(&last_message)
    }
}
