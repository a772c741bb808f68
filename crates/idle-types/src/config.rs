use serde::{Deserialize, Serialize};

/// Which optional parts of a provider stream are forwarded to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    pub send_sources: bool,
    pub send_reasoning: bool,
    pub send_usage: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            send_sources: true,
            send_reasoning: true,
            send_usage: true,
        }
    }
}
