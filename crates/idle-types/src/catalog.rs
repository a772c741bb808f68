use serde::{Deserialize, Serialize};

/// Starter prompt shown on an empty conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
    pub prompt: String,
}

impl Suggestion {
    pub fn new(suggestion: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            suggestion: suggestion.into(),
            prompt: prompt.into(),
        }
    }
}

/// Public view of an agent; never carries the system prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub name: String,
    pub agent_name: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub user_search: bool,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub provider: String,
    pub description: String,
    pub value: String,
}
