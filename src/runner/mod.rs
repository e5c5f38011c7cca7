mod orchestrator;

pub use orchestrator::{Analyses, Orchestrator};
