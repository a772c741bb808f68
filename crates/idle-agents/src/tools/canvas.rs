use super::{parse_args, Tool};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct PromptArgs {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct WorkflowArgs {
    workflow: String,
}

/// Echoes a generated prompt back so the client can open it in the canvas
pub struct ShowPromptInCanvas;

#[async_trait]
impl Tool for ShowPromptInCanvas {
    fn name(&self) -> &str {
        "showPromptInCanvas"
    }

    fn description(&self) -> &str {
        "This tool is used to show a prompt generator."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "The prompt to generate a prompt from your current context."
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: PromptArgs = parse_args(self.name(), args)?;
        Ok(json!({ "prompt": args.prompt }))
    }
}

/// Echoes an n8n workflow JSON back for the canvas
pub struct ShowWorkflowInCanvas;

#[async_trait]
impl Tool for ShowWorkflowInCanvas {
    fn name(&self) -> &str {
        "showWorkflowInCanvas"
    }

    fn description(&self) -> &str {
        "This tool is used to show a workflow in the canvas."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workflow": { "type": "string" }
            },
            "required": ["workflow"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: WorkflowArgs = parse_args(self.name(), args)?;
        Ok(json!({ "workflow": args.workflow }))
    }
}
