use super::{parse_args, Tool};
use crate::prompts::image_generation_prompt;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use idle_llm::{ChatClient, ChatOptions, ChatRequest, Message, ProviderOptions};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ImageArgs {
    prompt: String,
}

/// Generates an image through an image-capable model
pub struct GenerateImageTool {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl GenerateImageTool {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Tool for GenerateImageTool {
    fn name(&self) -> &str {
        "generateImageTool"
    }

    fn description(&self) -> &str {
        "Generate an image from a text description. Use it whenever the user asks for a picture, drawing or illustration."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "A detailed description of the image to generate."
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ImageArgs = parse_args(self.name(), args)?;

        let request = ChatRequest::new(
            self.model.clone(),
            vec![Message::human(image_generation_prompt(&args.prompt))],
        )
        .with_options(
            ChatOptions::new().provider(ProviderOptions::new().response_modalities(["TEXT", "IMAGE"])),
        );

        let response = self
            .client
            .chat(request)
            .await
            .context("Failed to generate image")?;

        let file = response
            .files
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Image model returned no image"))?;

        tracing::debug!(mime_type = %file.mime_type, bytes = file.data.len(), "Generated image");

        Ok(json!({
            "mimeType": file.mime_type,
            "base64Data": file.data,
        }))
    }
}
