use anyhow::Result;
use async_trait::async_trait;
use idle_agents::{baseline_tools, AgentCatalog, ToolSet};
use idle_llm::{ChatClient, ChatRequest, ChatResponse, EventStream, GeneratedFile};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Records the last request and answers with a fixed set of files
struct FakeImageModel {
    files: Vec<GeneratedFile>,
    last_request: Mutex<Option<ChatRequest>>,
}

impl FakeImageModel {
    fn new(files: Vec<GeneratedFile>) -> Arc<Self> {
        Arc::new(Self {
            files,
            last_request: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ChatClient for FakeImageModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        *self.last_request.lock().unwrap() = Some(request);
        Ok(ChatResponse {
            content: Some("Here you go".to_string()),
            tool_calls: None,
            files: self.files.clone(),
            usage: None,
            finish_reason: Some("stop".to_string()),
            raw: json!({}),
        })
    }

    async fn chat_stream(&self, _request: ChatRequest) -> Result<EventStream> {
        anyhow::bail!("not used")
    }
}

#[tokio::test]
async fn test_generate_image_returns_first_file() {
    let model = FakeImageModel::new(vec![
        GeneratedFile { mime_type: "image/png".to_string(), data: "iVBORw0KGgo=".to_string() },
        GeneratedFile { mime_type: "image/jpeg".to_string(), data: "/9j/".to_string() },
    ]);
    let tools = baseline_tools(model.clone(), "gemini-2.0-flash-preview-image-generation");

    let output = tools
        .execute("generateImageTool", json!({"prompt": "a cat astronaut"}))
        .await
        .unwrap();

    assert_eq!(output, json!({"mimeType": "image/png", "base64Data": "iVBORw0KGgo="}));

    let request = model.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "gemini-2.0-flash-preview-image-generation");
    assert_eq!(
        request.options.provider.response_modalities,
        Some(vec!["TEXT".to_string(), "IMAGE".to_string()])
    );
}

#[tokio::test]
async fn test_generate_image_without_file_fails() {
    let tools = baseline_tools(FakeImageModel::new(Vec::new()), "image-model");
    let err = tools
        .execute("generateImageTool", json!({"prompt": "anything"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no image"));
}

#[tokio::test]
async fn test_agent_tools_merge_over_baseline() {
    let catalog = AgentCatalog::builtin(None).unwrap();
    let baseline = baseline_tools(FakeImageModel::new(Vec::new()), "image-model");

    let yoda = ToolSet::merge(&baseline, &catalog.lookup("yoda").unwrap().tools);
    assert_eq!(yoda.names(), vec!["generateImageTool"]);

    let generator = ToolSet::merge(&baseline, &catalog.lookup("ai-prompt-generator").unwrap().tools);
    assert_eq!(generator.names(), vec!["generateImageTool", "showPromptInCanvas"]);

    let out = generator
        .execute("showPromptInCanvas", json!({"prompt": "You are a chef"}))
        .await
        .unwrap();
    assert_eq!(out["prompt"], "You are a chef");
}
