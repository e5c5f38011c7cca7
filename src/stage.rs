use serde::{Deserialize, Serialize};

/// Pipeline stages that invoke the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Stage {
    Financial,
    LifeMoment,
    Channel,
    NextBestAction,
    Synthesizer,
}

impl Stage {
    /// The four fan-out analyzers, in launch order.
    pub const ANALYZERS: [Stage; 4] = [
        Stage::Financial,
        Stage::LifeMoment,
        Stage::Channel,
        Stage::NextBestAction,
    ];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Financial => write!(f, "Financial"),
            Stage::LifeMoment => write!(f, "LifeMoment"),
            Stage::Channel => write!(f, "Channel"),
            Stage::NextBestAction => write!(f, "NextBestAction"),
            Stage::Synthesizer => write!(f, "Synthesizer"),
        }
    }
}
