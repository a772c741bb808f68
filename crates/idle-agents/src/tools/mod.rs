mod canvas;
mod image;

pub use canvas::{ShowPromptInCanvas, ShowWorkflowInCanvas};
pub use image::GenerateImageTool;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use idle_llm::ChatClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Deserialize tool arguments into their typed shape
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| anyhow!("Invalid arguments for {}: {}", tool, e))
}

/// Tools keyed by name, in insertion order
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any tool of the same name in place
    pub fn insert(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.insert(tool);
        self
    }

    /// Union of both sets; on a name collision the agent's tool wins
    pub fn merge(baseline: &ToolSet, agent: &ToolSet) -> ToolSet {
        let mut merged = baseline.clone();
        for tool in &agent.tools {
            merged.insert(Arc::clone(tool));
        }
        merged
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations handed to the provider
    pub fn definitions(&self) -> Vec<idle_llm::Tool> {
        self.tools
            .iter()
            .map(|t| idle_llm::Tool::new(t.name(), t.description(), t.parameters()))
            .collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow!("Tool '{}' not found", name))?;
        tool.execute(args).await
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.iter().map(|t| t.name())).finish()
    }
}

/// Tools every agent gets
pub fn baseline_tools(image_client: Arc<dyn ChatClient>, image_model: impl Into<String>) -> ToolSet {
    ToolSet::new().with(Arc::new(GenerateImageTool::new(image_client, image_model)))
}
