#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::StreamExt;
use idle_agents::{AgentCatalog, Tool, ToolSet};
use idle_chat::{ChatDispatcher, ClientResolver, DispatchConfig};
use idle_llm::{ChatClient, ChatRequest, ChatResponse, EventStream, ProviderError, StreamEvent};
use idle_types::ChatStreamEvent;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// What one `chat_stream` call should do
pub enum Step {
    Events(Vec<Result<StreamEvent, String>>),
    Reject(ProviderError),
    Hang,
}

/// Replays scripted steps and records every request it sees
pub struct ScriptedClient {
    steps: Mutex<VecDeque<Step>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
        Err(anyhow!("not scripted"))
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Events(events)) => Ok(futures::stream::iter(
                events.into_iter().map(|e| e.map_err(|m| anyhow!(m))),
            )
            .boxed()),
            Some(Step::Reject(error)) => Err(error.into()),
            Some(Step::Hang) => Ok(futures::stream::pending().boxed()),
            None => Ok(futures::stream::empty().boxed()),
        }
    }
}

pub struct StaticResolver(pub Arc<dyn ChatClient>);

impl ClientResolver for StaticResolver {
    fn resolve(&self, _api_key: Option<&str>) -> Result<Arc<dyn ChatClient>> {
        Ok(Arc::clone(&self.0))
    }
}

pub struct FailingResolver;

impl ClientResolver for FailingResolver {
    fn resolve(&self, _api_key: Option<&str>) -> Result<Arc<dyn ChatClient>> {
        Err(anyhow!("Invalid API key format"))
    }
}

/// Stand-in for the image tool, answers without calling a model
pub struct FakeImageTool;

#[async_trait]
impl Tool for FakeImageTool {
    fn name(&self) -> &str {
        "generateImageTool"
    }

    fn description(&self) -> &str {
        "Generate an image"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {"prompt": {"type": "string"}}, "required": ["prompt"]})
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Ok(json!({"mimeType": "image/png", "base64Data": "iVBORw0KGgo="}))
    }
}

pub struct BrokenTool;

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Err(anyhow!("disk on fire"))
    }
}

/// Never finishes; raises `cancelled` once its future is dropped
pub struct HangingTool {
    pub cancelled: Arc<AtomicBool>,
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Tool for HangingTool {
    fn name(&self) -> &str {
        "hang"
    }

    fn description(&self) -> &str {
        "Waits forever"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let _guard = SetOnDrop(Arc::clone(&self.cancelled));
        futures::future::pending::<()>().await;
        Ok(Value::Null)
    }
}

pub fn baseline() -> ToolSet {
    ToolSet::new().with(Arc::new(FakeImageTool))
}

pub fn dispatcher(client: Arc<dyn ChatClient>, config: DispatchConfig) -> ChatDispatcher {
    ChatDispatcher::new(
        Arc::new(AgentCatalog::builtin(None).unwrap()),
        baseline(),
        Arc::new(StaticResolver(client)),
        config,
    )
}

pub fn text(content: &str) -> Result<StreamEvent, String> {
    Ok(StreamEvent::Message { content: content.to_string() })
}

pub fn tool_call(id: &str, name: &str, arguments: &str) -> Result<StreamEvent, String> {
    Ok(StreamEvent::ToolCall {
        index: 0,
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    })
}

pub fn done() -> Result<StreamEvent, String> {
    Ok(StreamEvent::Done { finish_reason: Some("stop".to_string()) })
}

pub async fn collect(mut rx: mpsc::Receiver<ChatStreamEvent>) -> Vec<ChatStreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}
