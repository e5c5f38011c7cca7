use crate::stage::Stage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum CustomerError {
    #[error("Failed to read customer file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse customer JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse customer YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Opaque upstream failure raised at the capability boundary.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Execution timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Malformed output: {0}")]
    Malformed(String),

    #[error("Output violates contract '{contract}': {reason}")]
    ContractViolation {
        contract: &'static str,
        reason: String,
    },

    #[error("Upstream rejected request: {0}")]
    Rejected(String),
}

/// One stage could not obtain a contract-conforming value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} capability failed: {reason}")]
pub struct CapabilityError {
    pub stage: Stage,
    pub reason: String,
}

impl CapabilityError {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Fan-out failure: at least one analyzer failed, with attribution.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("analysis failed for {}: {}", stage_list(.failures), reason_list(.failures))]
pub struct AggregateAnalysisError {
    pub failures: Vec<CapabilityError>,
}

impl AggregateAnalysisError {
    pub fn failed_stages(&self) -> Vec<Stage> {
        self.failures.iter().map(|f| f.stage).collect()
    }
}

fn stage_list(failures: &[CapabilityError]) -> String {
    failures
        .iter()
        .map(|f| f.stage.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn reason_list(failures: &[CapabilityError]) -> String {
    failures
        .iter()
        .map(|f| f.reason.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Analysis stage failed: {0}")]
    Analysis(#[from] AggregateAnalysisError),

    #[error("Synthesis stage failed: {0}")]
    Synthesis(#[source] CapabilityError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Analysis(_) => "analysis",
            PipelineError::Synthesis(_) => "synthesis",
        }
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
