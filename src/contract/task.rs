use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a capability needs to know about one task, apart from its contract.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescription {
    /// Fixed role instruction for the stage.
    pub role: String,
    /// Deterministic context block rendered from stage inputs.
    pub context: String,
    /// The request itself.
    pub request: String,
}

impl TaskDescription {
    /// Flatten into a single prompt.
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n\n## Task\n\n{}",
            self.role.trim(),
            self.context.trim(),
            self.request.trim()
        )
    }
}

type FactFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// A pure, named computation the capability may call.
#[derive(Clone)]
pub struct Fact {
    pub description: &'static str,
    compute: FactFn,
}

impl Fact {
    pub fn call(&self) -> Value {
        (self.compute)()
    }
}

impl std::fmt::Debug for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fact")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Callable facts keyed by name. Facts never mutate state, so calling them
/// eagerly or lazily, in any order, yields the same values.
#[derive(Debug, Clone, Default)]
pub struct FactSet {
    facts: BTreeMap<&'static str, Fact>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: &'static str, description: &'static str, compute: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.facts.insert(
            name,
            Fact {
                description,
                compute: Arc::new(compute),
            },
        );
        self
    }

    #[cfg(test)]
    pub fn call(&self, name: &str) -> Option<Value> {
        self.facts.get(name).map(Fact::call)
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.facts.keys().copied()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Evaluate every fact up front and render the results as a prompt section.
    /// Used by capabilities that cannot call back into the process.
    pub fn render_evaluated(&self) -> String {
        if self.facts.is_empty() {
            return String::new();
        }

        let mut out = String::from("## Computed Facts\n");
        for (name, fact) in &self.facts {
            out.push_str(&format!("- {} ({}): {}\n", name, fact.description, fact.call()));
        }
        out
    }
}
