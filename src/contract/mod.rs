//! Structured task contracts: the schema each stage's output must satisfy,
//! plus the task description and callable facts handed to the capability.

mod outputs;
mod task;

pub use outputs::*;
pub use task::{FactSet, TaskDescription};

use crate::error::ProviderError;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A stage output type with a declared contract.
///
/// Enumerations are enforced by deserialization; `check` covers the numeric
/// ranges that serde cannot express.
pub trait TaskOutput: DeserializeOwned + Serialize + JsonSchema + Send + 'static {
    const CONTRACT: &'static str;

    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Named JSON Schema describing a stage's output.
#[derive(Debug, Clone)]
pub struct Contract {
    pub name: &'static str,
    pub schema: Value,
}

impl Contract {
    pub fn of<T: TaskOutput>() -> Self {
        let schema = schemars::schema_for!(T);
        Self {
            name: T::CONTRACT,
            schema: serde_json::to_value(schema).unwrap_or(Value::Null),
        }
    }

    /// Pretty-printed schema for embedding in prompts or files.
    pub fn schema_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_default()
    }
}

/// Turn a raw capability value into a contract-conforming output.
pub fn conform<T: TaskOutput>(value: Value) -> Result<T, ProviderError> {
    let output: T =
        serde_json::from_value(value).map_err(|e| ProviderError::ContractViolation {
            contract: T::CONTRACT,
            reason: e.to_string(),
        })?;

    output
        .check()
        .map_err(|reason| ProviderError::ContractViolation {
            contract: T::CONTRACT,
            reason,
        })?;

    Ok(output)
}

pub(crate) fn unit_interval(field: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be within [0.0, 1.0], got {}", field, value))
    }
}
